//! Per-route request accounting.

use crate::{services::AppMetrics, utils::route::extract_route_pattern};
use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web,
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    time::Instant,
};

/// Counts requests and observes latency per method and matched route.
///
/// Wraps the whole app, so requests the signature check turns away are
/// counted under their 403 along with everything else. Does nothing when no
/// `AppMetrics` is registered as app data.
pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsService { service }))
    }
}

pub struct MetricsService<S> {
    service: S,
}

/// What is known about a request before it is handled
struct Observation {
    metrics: web::Data<AppMetrics>,
    method: String,
    route: String,
    started: Instant,
}

impl Observation {
    fn finish(self, status: u16) {
        self.metrics
            .record_request(&self.method, &self.route, status, self.started.elapsed());
    }
}

impl<S, B> Service<ServiceRequest> for MetricsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let observation = req
            .app_data::<web::Data<AppMetrics>>()
            .cloned()
            .map(|metrics| Observation {
                metrics,
                method: req.method().to_string(),
                route: extract_route_pattern(req.request()),
                started: Instant::now(),
            });

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            if let Some(observation) = observation {
                let status = match &result {
                    Ok(res) => res.status(),
                    Err(e) => e.as_response_error().status_code(),
                };
                observation.finish(status.as_u16());
            }

            result
        })
    }
}
