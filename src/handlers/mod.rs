//! HTTP request handlers and application assembly.

pub mod health;
pub mod metrics;
pub mod protected;
pub mod version;

pub use health::*;
pub use metrics::*;
pub use protected::*;
pub use version::*;

use crate::{
    config::MetricsConfig,
    middleware::{MetricsMiddleware, RequestIdMiddleware, SignatureVerification},
    services::{AppMetrics, verifier::SignatureVerifier},
};
use actix_web::{
    App,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web,
};
use std::sync::Arc;

/// Path prefix guarded by signature verification
pub const PROTECTED_SCOPE: &str = "/api/protected";

/// Build the gateway application.
///
/// Health, version and metrics stay open; everything under
/// [`PROTECTED_SCOPE`] must carry a valid `X-Signature`.
pub fn create_app(
    verifier: Arc<SignatureVerifier>,
    metrics: web::Data<AppMetrics>,
    metrics_config: MetricsConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(MetricsMiddleware)
        .wrap(RequestIdMiddleware)
        .app_data(metrics)
        .app_data(web::Data::new(metrics_config))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .service(
            web::scope(PROTECTED_SCOPE)
                .wrap(SignatureVerification::new(verifier))
                .default_service(web::to(acknowledge)),
        )
}
