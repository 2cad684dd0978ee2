pub mod device_repo;
pub mod device_type_repo;

pub use device_repo::DeviceRepo;
pub use device_type_repo::DeviceTypeRepo;
