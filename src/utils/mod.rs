//! Utility functions and helper modules.
//!
//! Request inspection helpers, build metadata, and the signing primitives
//! shared by the verifier and client-side tooling.

pub mod build_info;
pub mod http;
pub mod route;
pub mod signature;

pub use http::*;
pub use route::*;
pub use signature::*;
