//! Health check endpoint handler.

use crate::models::HealthResponse;
use actix_web::web;

/// Health check endpoint
///
/// Returns the current health status of the gateway. Not signature protected,
/// so load balancers and orchestrators can call it without a secret.
pub async fn health() -> web::Json<HealthResponse> {
    web::Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
