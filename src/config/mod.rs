//! Configuration structures and loading utilities.
//!
//! Every structure loads from environment variables through `from_env()`.
//! The signature configuration can also be read from JSON.

pub mod metrics;
pub mod server;
pub mod signature;

pub use metrics::*;
pub use server::*;
pub use signature::*;
