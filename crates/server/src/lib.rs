//! Server crate for the race outcome prediction API
//!
//! Exposed as a library so integration tests can drive the router directly.

pub mod api;
pub mod config;
