//! Core services: request signature verification and metrics collection.

pub mod metrics;
pub mod verifier;

pub use metrics::*;
pub use verifier::*;
