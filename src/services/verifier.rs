//! Request signature verification.
//!
//! A [`SignatureVerifier`] is built once from configuration and then shared
//! read-only between workers. For every request it:
//!
//! 1. collects the configured header values in order, rejecting the request
//!    at the first one that is absent or empty;
//! 2. concatenates them without a delimiter;
//! 3. computes `Base64(HMAC-SHA256(secret, message))`;
//! 4. compares that code to `X-Signature` in constant time.

use crate::{
    config::SignatureConfig,
    error::{ConfigError, VerificationError},
    utils::signature::{
        SIGNATURE_HEADER, SignatureScheme, SigningKey, build_message, signatures_match,
    },
};
use actix_web::{ResponseError, http::StatusCode, http::header::HeaderMap};
use std::collections::HashMap;
use tracing::debug;

/// Case-insensitive header lookup over an incoming request.
///
/// Implementors return `None` when the header was not sent.
pub trait HeaderSource {
    fn header(&self, name: &str) -> Option<&[u8]>;
}

impl HeaderSource for HeaderMap {
    fn header(&self, name: &str) -> Option<&[u8]> {
        self.get(name).map(|value| value.as_bytes())
    }
}

/// An exact-case key wins. Otherwise, among keys equal to `name` ignoring
/// ASCII case, the lexicographically smallest is used so the result does not
/// depend on iteration order.
impl HeaderSource for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<&[u8]> {
        if let Some(value) = self.get(name) {
            return Some(value.as_bytes());
        }

        self.iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, value)| value.as_bytes())
    }
}

/// Outcome of evaluating one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Continue to the downstream handler untouched
    Forward,
    /// Short-circuit with [`Decision::status`] and the error's message
    Reject(VerificationError),
}

impl Decision {
    pub fn is_forward(&self) -> bool {
        matches!(self, Self::Forward)
    }

    /// Status code to answer with, `None` when forwarding
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Forward => None,
            Self::Reject(err) => Some(err.status_code()),
        }
    }

    /// Label for metrics: `forwarded`, `missing_header` or `invalid_signature`
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Forward => "forwarded",
            Self::Reject(err) => err.reason(),
        }
    }
}

/// Verifies `X-Signature` against an HMAC over selected header values.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    headers: Vec<String>,
    key: SigningKey,
    scheme: SignatureScheme,
}

impl SignatureVerifier {
    /// Build a verifier using the standard HMAC-SHA256 scheme.
    ///
    /// Fails if `headers` or `secret` is empty. Duplicate header names are
    /// kept and contribute their value once per occurrence.
    pub fn new<S: AsRef<[u8]>>(headers: Vec<String>, secret: S) -> Result<Self, ConfigError> {
        Self::with_scheme(headers, secret, SignatureScheme::Standard)
    }

    pub fn with_scheme<S: AsRef<[u8]>>(
        headers: Vec<String>,
        secret: S,
        scheme: SignatureScheme,
    ) -> Result<Self, ConfigError> {
        if headers.is_empty() {
            return Err(ConfigError::NoHeaders);
        }
        let key = SigningKey::new(secret.as_ref())?;

        Ok(Self {
            headers,
            key,
            scheme,
        })
    }

    pub fn from_config(config: &SignatureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::with_scheme(
            config.headers.clone(),
            config.secret_key.as_bytes(),
            config.scheme,
        )
    }

    /// Configured header names, in signing order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    /// Gather the signed header values in configured order.
    ///
    /// Empty values are treated the same as absent ones.
    pub fn collect_parts<'r, R>(&self, request: &'r R) -> Result<Vec<&'r [u8]>, VerificationError>
    where
        R: HeaderSource + ?Sized,
    {
        self.headers
            .iter()
            .map(|name| match request.header(name) {
                Some(value) if !value.is_empty() => Ok(value),
                _ => Err(VerificationError::MissingHeader(name.clone())),
            })
            .collect()
    }

    /// Code the caller should have sent for this request
    pub fn expected_signature<R>(&self, request: &R) -> Result<String, VerificationError>
    where
        R: HeaderSource + ?Sized,
    {
        let parts = self.collect_parts(request)?;
        let message = build_message(parts);
        Ok(self.key.sign(&message, self.scheme))
    }

    /// Verify the request, returning the first failure
    pub fn check<R>(&self, request: &R) -> Result<(), VerificationError>
    where
        R: HeaderSource + ?Sized,
    {
        let expected = self.expected_signature(request)?;
        let supplied = request.header(SIGNATURE_HEADER).unwrap_or_default();

        if signatures_match(expected.as_bytes(), supplied) {
            Ok(())
        } else {
            Err(VerificationError::InvalidSignature)
        }
    }

    /// Decide whether the request may continue down the pipeline
    pub fn evaluate<R>(&self, request: &R) -> Decision
    where
        R: HeaderSource + ?Sized,
    {
        match self.check(request) {
            Ok(()) => Decision::Forward,
            Err(err) => {
                debug!(reason = err.reason(), "Request signature rejected");
                Decision::Reject(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::signature::sign_headers;
    use actix_web::http::header::{HeaderName, HeaderValue};

    const VALID_SIGNATURE: &str = "wyFolE99YYpJNpS0FuYkK+YI1kNblJDHgQWNlXEkkyo=";

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new(
            vec![
                "X-Date".to_string(),
                "Authorization".to_string(),
                "APP-ID".to_string(),
            ],
            "s3cr3t",
        )
        .unwrap()
    }

    fn request(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn signed_request(app_id: &str) -> HashMap<String, String> {
        request(&[
            ("X-Date", "2024-01-01"),
            ("Authorization", "Bearer t"),
            ("APP-ID", app_id),
            ("X-Signature", VALID_SIGNATURE),
        ])
    }

    #[test]
    fn test_construction_requires_headers_and_secret() {
        assert!(matches!(
            SignatureVerifier::new(vec![], "s3cr3t"),
            Err(ConfigError::NoHeaders)
        ));
        assert!(matches!(
            SignatureVerifier::new(vec!["A".to_string()], ""),
            Err(ConfigError::EmptySecret)
        ));
    }

    #[test]
    fn test_from_config() {
        let config = SignatureConfig {
            secret_key: "s3cr3t".to_string(),
            ..Default::default()
        };
        let verifier = SignatureVerifier::from_config(&config).unwrap();
        assert_eq!(verifier.headers(), config.headers.as_slice());
        assert_eq!(verifier.scheme(), SignatureScheme::Standard);

        assert!(matches!(
            SignatureVerifier::from_config(&SignatureConfig::default()),
            Err(ConfigError::EmptySecret)
        ));
    }

    #[test]
    fn test_valid_signature_forwards() {
        assert_eq!(verifier().evaluate(&signed_request("42")), Decision::Forward);
    }

    #[test]
    fn test_tampered_value_rejected() {
        let decision = verifier().evaluate(&signed_request("43"));
        assert_eq!(
            decision,
            Decision::Reject(VerificationError::InvalidSignature)
        );
        assert_eq!(decision.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(decision.outcome(), "invalid_signature");
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let verifier = verifier();
        let req = signed_request("42");
        let first = verifier.evaluate(&req);
        for _ in 0..10 {
            assert_eq!(verifier.evaluate(&req), first);
        }
    }

    #[test]
    fn test_missing_header_takes_precedence() {
        let mut req = signed_request("42");
        req.remove("APP-ID");

        assert_eq!(
            verifier().evaluate(&req),
            Decision::Reject(VerificationError::MissingHeader("APP-ID".to_string()))
        );
    }

    #[test]
    fn test_first_missing_header_reported() {
        let req = request(&[("APP-ID", "42"), ("X-Signature", VALID_SIGNATURE)]);

        assert_eq!(
            verifier().evaluate(&req),
            Decision::Reject(VerificationError::MissingHeader("X-Date".to_string()))
        );
    }

    #[test]
    fn test_empty_header_counts_as_missing() {
        let mut req = signed_request("42");
        req.insert("Authorization".to_string(), String::new());

        assert_eq!(
            verifier().evaluate(&req),
            Decision::Reject(VerificationError::MissingHeader(
                "Authorization".to_string()
            ))
        );
    }

    #[test]
    fn test_absent_signature_rejected() {
        let mut req = signed_request("42");
        req.remove("X-Signature");

        assert_eq!(
            verifier().evaluate(&req),
            Decision::Reject(VerificationError::InvalidSignature)
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let req = request(&[
            ("x-date", "2024-01-01"),
            ("AUTHORIZATION", "Bearer t"),
            ("app-id", "42"),
            ("x-signature", VALID_SIGNATURE),
        ]);
        assert!(verifier().evaluate(&req).is_forward());
    }

    #[test]
    fn test_case_colliding_keys_resolve_deterministically() {
        let req = request(&[("app-id", "1"), ("APP-ID", "2"), ("App-Id", "3")]);
        assert_eq!(req.header("APP-ID"), Some("2".as_bytes()));
        assert_eq!(req.header("app-id"), Some("1".as_bytes()));
        // "APP-ID" < "App-Id" < "app-id"
        assert_eq!(req.header("aPP-id"), Some("2".as_bytes()));

        for _ in 0..10 {
            let req = request(&[("app-id", "1"), ("App-Id", "3")]);
            assert_eq!(req.header("APP-ID"), Some("3".as_bytes()));
        }
    }

    #[test]
    fn test_header_map_source() {
        let mut headers = HeaderMap::new();
        for (name, value) in [
            ("x-date", "2024-01-01"),
            ("authorization", "Bearer t"),
            ("app-id", "42"),
            ("x-signature", VALID_SIGNATURE),
        ] {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        assert!(verifier().evaluate(&headers).is_forward());

        // a repeated header signs with its first value
        headers.append(
            HeaderName::from_static("app-id"),
            HeaderValue::from_static("43"),
        );
        assert_eq!(headers.get_all("app-id").count(), 2);
        assert!(verifier().evaluate(&headers).is_forward());

        let mut reordered = HeaderMap::new();
        for (name, value) in [
            ("x-date", "2024-01-01"),
            ("authorization", "Bearer t"),
            ("app-id", "43"),
            ("app-id", "42"),
            ("x-signature", VALID_SIGNATURE),
        ] {
            reordered.append(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        assert_eq!(
            verifier().evaluate(&reordered),
            Decision::Reject(VerificationError::InvalidSignature)
        );
    }

    #[test]
    fn test_duplicate_headers_repeat_in_message() {
        let verifier =
            SignatureVerifier::new(vec!["A".to_string(), "A".to_string()], "k").unwrap();
        let signature = sign_headers(&["x", "x"], b"k", SignatureScheme::Standard).unwrap();
        let req = request(&[("A", "x"), ("X-Signature", signature.as_str())]);

        assert_eq!(verifier.expected_signature(&req).unwrap(), signature);
        assert!(verifier.evaluate(&req).is_forward());
    }

    #[test]
    fn test_order_sensitive_verification() {
        let verifier = SignatureVerifier::new(vec!["A".to_string(), "B".to_string()], "k").unwrap();
        let swapped = sign_headers(&["y", "x"], b"k", SignatureScheme::Standard).unwrap();
        let req = request(&[("A", "x"), ("B", "y"), ("X-Signature", swapped.as_str())]);

        assert_eq!(
            verifier.evaluate(&req),
            Decision::Reject(VerificationError::InvalidSignature)
        );
    }

    #[test]
    fn test_legacy_scheme() {
        let verifier = SignatureVerifier::with_scheme(
            vec![
                "X-Date".to_string(),
                "Authorization".to_string(),
                "APP-ID".to_string(),
            ],
            "s3cr3t",
            SignatureScheme::Legacy,
        )
        .unwrap();
        let mut req = signed_request("42");
        req.insert(
            "X-Signature".to_string(),
            "MjAyNC0wMS0wMUJlYXJlciB0NDI8gcyUluHCUlD2zLhfaXwbtiPjSA1lOK2MtqZkgUJ3fQ==".to_string(),
        );

        assert!(verifier.evaluate(&req).is_forward());
        assert!(!verifier.evaluate(&signed_request("42")).is_forward());
    }

    #[test]
    fn test_concurrent_evaluation() {
        let verifier = std::sync::Arc::new(verifier());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let verifier = std::sync::Arc::clone(&verifier);
                std::thread::spawn(move || {
                    let app_id = if i % 2 == 0 { "42" } else { "43" };
                    (i, verifier.evaluate(&signed_request(app_id)).is_forward())
                })
            })
            .collect();

        for handle in handles {
            let (i, forwarded) = handle.join().unwrap();
            assert_eq!(forwarded, i % 2 == 0);
        }
    }

    #[test]
    fn test_verifier_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SignatureVerifier>();
    }
}
