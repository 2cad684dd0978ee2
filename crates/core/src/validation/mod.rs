//! Dynamic attribute validation engine.
//!
//! Rule groups come from an external catalog and are keyed by device type
//! name. A group applies only while its trigger holds; every rule of an
//! applied group is then checked against the device's property bag.

pub mod catalog;
pub mod constraint;
pub mod outcome;
pub mod resolver;
pub mod source;
pub mod trigger;
pub mod validator;
