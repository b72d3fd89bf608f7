//! Signature Gateway - HMAC header-signature verification for Actix Web
//!
//! Rejects HTTP requests whose `X-Signature` header does not match
//! `Base64(HMAC-SHA256(secret, message))`, where the message is the
//! delimiter-free concatenation of a configured, ordered list of header
//! values. Accepted requests continue to the downstream handler untouched;
//! rejected ones receive `403 Forbidden` with a plain-text reason.
//!
//! ## Architecture
//!
//! - `services/` - the [`SignatureVerifier`] decision procedure and metrics
//! - `middleware/` - [`SignatureVerification`] plus request IDs and metrics
//! - `config/` - environment and JSON configuration loading
//! - `utils/` - message assembly, signing, constant-time comparison
//! - `handlers/` - health, version, metrics and the protected scope
//! - `models/` - response models and audit events
//!
//! ## Quick Start
//!
//! ```no_run
//! use actix_web::{App, HttpServer, web};
//! use signature_gateway::{SignatureConfig, SignatureVerification, SignatureVerifier};
//! use std::sync::Arc;
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = SignatureConfig::from_env().expect("invalid signature config");
//!     let verifier = Arc::new(SignatureVerifier::from_config(&config).expect("invalid signature config"));
//!
//!     HttpServer::new(move || {
//!         App::new().service(
//!             web::scope("/api").wrap(SignatureVerification::new(Arc::clone(&verifier))),
//!         )
//!     })
//!     .bind("127.0.0.1:8080")?
//!     .run()
//!     .await
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{
    DEFAULT_BIND_ADDR, DEFAULT_SIGNED_HEADERS, MetricsConfig, ServerConfig, SignatureConfig,
};
pub use error::{ConfigError, VerificationError};
pub use handlers::{PROTECTED_SCOPE, acknowledge, create_app, get_metrics, health, version};
pub use middleware::{
    MetricsMiddleware, MetricsService, RequestId, RequestIdMiddleware, RequestIdService,
    SignatureVerification, SignatureVerificationService,
};
pub use models::{
    HealthResponse, ProtectedResponse, SignatureAuditEvent, SignatureEventOutcome,
    VersionResponse,
};
pub use services::{AppMetrics, Decision, HeaderSource, SignatureVerifier};
pub use utils::signature::{
    SIGNATURE_HEADER, SignatureScheme, SigningKey, build_message, compute_signature, sign_headers,
    signatures_match,
};
