//! API response models for standard endpoints.

use serde::{Deserialize, Serialize};

/// Response model for the health check endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Response model for the version information endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
    pub commit: String,
    pub build_time: String,
}

/// Returned by the downstream handler once a request passed verification
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtectedResponse {
    pub status: String,
    pub method: String,
    pub path: String,
}
