//! Request ID middleware for tracing and logging.

use crate::utils::http::{extract_client_ip, extract_user_agent};
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use std::{
    future::{Ready, ready},
    pin::Pin,
};
use uuid::Uuid;

/// Request ID stored in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Request ID middleware factory
///
/// This middleware ensures every request has a unique ID for tracing purposes.
/// It will use an existing X-Request-ID header if present, or generate a new UUID.
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService { service }))
    }
}

/// The actual request ID middleware service
pub struct RequestIdService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
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
        let start_time = std::time::Instant::now();

        let request_id = req
            .headers()
            .get("X-Request-ID")
            .and_then(|h| h.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        req.extensions_mut().insert(RequestId(request_id.clone()));

        tracing::info!(
            target: "request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.path(),
            ip_address = %extract_client_ip(req.request()),
            user_agent = ?extract_user_agent(req.request()),
            "Incoming request"
        );

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            let duration = start_time.elapsed();

            res.headers_mut().insert(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_str(&request_id)
                    .unwrap_or_else(|_| HeaderValue::from_static("invalid")),
            );

            tracing::info!(
                target: "request",
                request_id = %request_id,
                status = %res.status().as_u16(),
                duration_ms = %duration.as_millis(),
                "Request completed"
            );

            Ok(res)
        })
    }
}
