//! Custom middleware implementations.
//!
//! Signature verification guards protected routes; request IDs and metrics
//! wrap the whole application.

pub mod metrics;
pub mod request_id;
pub mod signature;

pub use metrics::*;
pub use request_id::*;
pub use signature::*;
