//! Domain logic for the device inventory service.
//!
//! Everything here is free of HTTP and SQL concerns: the device request DTO,
//! the collaborator traits the service depends on, and the dynamic attribute
//! validation engine.

pub mod device;
pub mod error;
pub mod types;
pub mod validation;
