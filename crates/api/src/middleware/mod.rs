//! Request middleware.
//!
//! - [`device_validation::validate_device_request`] -- Checks device
//!   create/update bodies against the rule catalog before they reach a handler.

pub mod device_validation;
