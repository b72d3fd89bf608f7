//! Data models for responses and audit events.

pub mod api;
pub mod audit;

pub use api::*;
pub use audit::*;
