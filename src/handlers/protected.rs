//! Downstream handler reached only through signature verification.

use crate::models::ProtectedResponse;
use actix_web::{HttpRequest, web};

/// Acknowledge a request that passed signature verification
pub async fn acknowledge(req: HttpRequest) -> web::Json<ProtectedResponse> {
    web::Json(ProtectedResponse {
        status: "accepted".to_string(),
        method: req.method().to_string(),
        path: req.path().to_string(),
    })
}
