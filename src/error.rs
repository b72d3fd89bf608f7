//! Error types for configuration and request verification.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

/// Raised while building a verifier. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("at least one header name must be configured for signing")]
    NoHeaders,

    #[error("secret key must not be empty")]
    EmptySecret,

    #[error("unknown signature scheme: {0} (expected \"standard\" or \"legacy\")")]
    UnknownScheme(String),

    #[error("invalid JSON configuration: {0}")]
    InvalidJson(String),
}

/// Why a single request was rejected.
///
/// The `Display` output is the exact plain-text body sent back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    #[error("Invalid signature")]
    InvalidSignature,
}

impl VerificationError {
    /// Short label used for metrics and audit logs
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingHeader(_) => "missing_header",
            Self::InvalidSignature => "invalid_signature",
        }
    }
}

impl ResponseError for VerificationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::FORBIDDEN
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}
