//! Audit logging data structures and types.

use crate::{error::VerificationError, services::verifier::Decision};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Outcome of a signature verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureEventOutcome {
    Forwarded,
    Rejected,
}

/// Structured audit log entry for one verification decision.
///
/// Never carries the secret, the supplied signature or the expected code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureAuditEvent {
    pub outcome: SignatureEventOutcome,
    pub reason: String,
    pub missing_header: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub method: String,
    pub endpoint: String,
    pub request_id: Option<String>,
}

impl SignatureAuditEvent {
    /// Create a new audit event describing `decision`
    pub fn new(decision: &Decision, ip_address: String, method: String, endpoint: String) -> Self {
        let (outcome, missing_header) = match decision {
            Decision::Forward => (SignatureEventOutcome::Forwarded, None),
            Decision::Reject(VerificationError::MissingHeader(name)) => {
                (SignatureEventOutcome::Rejected, Some(name.clone()))
            }
            Decision::Reject(_) => (SignatureEventOutcome::Rejected, None),
        };

        Self {
            outcome,
            reason: decision.outcome().to_string(),
            missing_header,
            timestamp: Utc::now(),
            ip_address,
            user_agent: None,
            method,
            endpoint,
            request_id: None,
        }
    }

    /// Add user agent information
    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Add request ID information
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Log the audit event using structured logging.
    ///
    /// Rejections are logged at `warn`.
    pub fn log(&self) {
        match self.outcome {
            SignatureEventOutcome::Forwarded => info!(
                target: "signature_audit",
                outcome = ?self.outcome,
                reason = %self.reason,
                timestamp = %self.timestamp,
                ip_address = %self.ip_address,
                user_agent = ?self.user_agent,
                method = %self.method,
                endpoint = %self.endpoint,
                request_id = ?self.request_id,
                "Request signature verified"
            ),
            SignatureEventOutcome::Rejected => warn!(
                target: "signature_audit",
                outcome = ?self.outcome,
                reason = %self.reason,
                missing_header = ?self.missing_header,
                timestamp = %self.timestamp,
                ip_address = %self.ip_address,
                user_agent = ?self.user_agent,
                method = %self.method,
                endpoint = %self.endpoint,
                request_id = ?self.request_id,
                "Request signature rejected"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(decision: &Decision) -> SignatureAuditEvent {
        SignatureAuditEvent::new(
            decision,
            "10.0.0.1".to_string(),
            "GET".to_string(),
            "/api/protected/ping".to_string(),
        )
    }

    #[test]
    fn test_forwarded_event() {
        let event = event(&Decision::Forward).with_request_id(Some("req-1".to_string()));
        assert_eq!(event.outcome, SignatureEventOutcome::Forwarded);
        assert_eq!(event.reason, "forwarded");
        assert!(event.missing_header.is_none());
        assert_eq!(event.request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn test_rejected_event_serialization() {
        let decision = Decision::Reject(VerificationError::MissingHeader("APP-ID".to_string()));
        let event = event(&decision).with_user_agent(Some("curl/8".to_string()));

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["outcome"], "rejected");
        assert_eq!(json["reason"], "missing_header");
        assert_eq!(json["missing_header"], "APP-ID");
        assert_eq!(json["user_agent"], "curl/8");
    }
}
