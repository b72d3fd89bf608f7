//! Metrics endpoint handler.

use crate::{config::MetricsConfig, services::AppMetrics};
use actix_web::{Error, HttpRequest, HttpResponse, Result, web};

/// Prometheus metrics endpoint
///
/// Returns Prometheus-formatted metrics, including verification outcomes.
pub async fn get_metrics(req: HttpRequest) -> Result<HttpResponse, Error> {
    if let Some(config) = req.app_data::<web::Data<MetricsConfig>>()
        && !config.enabled
    {
        return Ok(HttpResponse::ServiceUnavailable()
            .content_type("text/plain")
            .body("Metrics collection is disabled"));
    }

    let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() else {
        return Err(actix_web::error::ErrorServiceUnavailable(
            "Metrics not available",
        ));
    };

    match metrics.render() {
        Ok(metrics_output) => Ok(HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4; charset=utf-8")
            .body(metrics_output)),
        Err(e) => Err(actix_web::error::ErrorInternalServerError(format!(
            "Failed to render metrics: {e}"
        ))),
    }
}
