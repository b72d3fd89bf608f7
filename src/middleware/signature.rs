//! Request signature verification middleware.

use crate::{
    middleware::request_id::RequestId,
    models::SignatureAuditEvent,
    services::{
        AppMetrics,
        verifier::{Decision, SignatureVerifier},
    },
    utils::http::{extract_client_ip, extract_user_agent},
};
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web,
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    sync::Arc,
};

/// Signature verification middleware factory
///
/// Rejects requests whose `X-Signature` does not match the HMAC of the
/// configured headers with `403 Forbidden`. Accepted requests reach the
/// wrapped service unchanged.
///
/// ```no_run
/// use actix_web::{App, web};
/// use signature_gateway::{SignatureVerification, SignatureVerifier};
/// use std::sync::Arc;
///
/// let verifier = Arc::new(
///     SignatureVerifier::new(vec!["X-Date".to_string()], "s3cr3t").unwrap(),
/// );
/// let app = App::new().service(
///     web::scope("/api/protected").wrap(SignatureVerification::new(verifier)),
/// );
/// ```
pub struct SignatureVerification {
    verifier: Arc<SignatureVerifier>,
}

impl SignatureVerification {
    pub fn new(verifier: Arc<SignatureVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SignatureVerification
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SignatureVerificationService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SignatureVerificationService {
            service,
            verifier: Arc::clone(&self.verifier),
        }))
    }
}

/// The actual signature verification middleware service
pub struct SignatureVerificationService<S> {
    service: S,
    verifier: Arc<SignatureVerifier>,
}

impl<S, B> Service<ServiceRequest> for SignatureVerificationService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let decision = self.verifier.evaluate(req.headers());

        let request_id = req.extensions().get::<RequestId>().map(|id| id.0.clone());
        SignatureAuditEvent::new(
            &decision,
            extract_client_ip(req.request()),
            req.method().to_string(),
            req.path().to_string(),
        )
        .with_user_agent(extract_user_agent(req.request()))
        .with_request_id(request_id)
        .log();

        if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
            metrics.record_verification(decision.outcome());
        }

        match decision {
            Decision::Forward => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Decision::Reject(err) => {
                let res = req.into_response(err.error_response()).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
