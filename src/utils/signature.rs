//! HMAC-SHA256 message assembly, signing, and constant-time comparison.

use crate::error::ConfigError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::{fmt, str::FromStr};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the caller's Base64-encoded signature
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// How the expected code is derived from the assembled message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureScheme {
    /// `Base64(HMAC-SHA256(secret, message))`
    #[default]
    Standard,
    /// `Base64(message || HMAC-SHA256(secret, ""))`.
    ///
    /// Matches signers deployed against the older filter byte-for-byte. The
    /// tag does not depend on the message, so anyone who has seen one valid
    /// signature can forge others. Only enable while migrating those signers.
    Legacy,
}

impl SignatureScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Legacy => "legacy",
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "legacy" => Ok(Self::Legacy),
            other => Err(ConfigError::UnknownScheme(other.to_string())),
        }
    }
}

/// A keyed HMAC-SHA256 state, cloned for every message it signs.
#[derive(Clone)]
pub struct SigningKey {
    mac: HmacSha256,
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

impl SigningKey {
    /// Key an HMAC-SHA256 instance with `secret`. Empty secrets are refused.
    pub fn new(secret: &[u8]) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        let mac = HmacSha256::new_from_slice(secret).map_err(|_| ConfigError::EmptySecret)?;
        Ok(Self { mac })
    }

    /// Compute the Base64 (standard alphabet, padded) code for `message`
    pub fn sign(&self, message: &[u8], scheme: SignatureScheme) -> String {
        match scheme {
            SignatureScheme::Standard => {
                let mut mac = self.mac.clone();
                mac.update(message);
                BASE64.encode(mac.finalize().into_bytes())
            }
            SignatureScheme::Legacy => {
                let tag = self.mac.clone().finalize().into_bytes();
                let mut out = Vec::with_capacity(message.len() + tag.len());
                out.extend_from_slice(message);
                out.extend_from_slice(&tag);
                BASE64.encode(out)
            }
        }
    }
}

/// Concatenate header values in order with no delimiter
pub fn build_message<'a, I>(parts: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    parts.into_iter().fold(Vec::new(), |mut message, part| {
        message.extend_from_slice(part);
        message
    })
}

/// One-shot signing: key with `secret` and sign `message`
pub fn compute_signature(
    secret: &[u8],
    message: &[u8],
    scheme: SignatureScheme,
) -> Result<String, ConfigError> {
    Ok(SigningKey::new(secret)?.sign(message, scheme))
}

/// Produce the `X-Signature` value a client must send for the given header
/// values, listed in the same order the verifier is configured with.
pub fn sign_headers<S: AsRef<str>>(
    values: &[S],
    secret: &[u8],
    scheme: SignatureScheme,
) -> Result<String, ConfigError> {
    let message = build_message(values.iter().map(|v| v.as_ref().as_bytes()));
    compute_signature(secret, &message, scheme)
}

/// Compare two signatures without leaking where they differ.
///
/// Both inputs are padded to the longer length so the content comparison
/// always touches every byte; the length check is folded in with `&`.
pub fn signatures_match(expected: &[u8], supplied: &[u8]) -> bool {
    let max_len = expected.len().max(supplied.len());

    let mut expected_padded = vec![0u8; max_len];
    let mut supplied_padded = vec![0xFFu8; max_len];
    expected_padded[..expected.len()].copy_from_slice(expected);
    supplied_padded[..supplied.len()].copy_from_slice(supplied);

    let lengths_equal = expected.len().ct_eq(&supplied.len());
    let contents_equal = expected_padded.ct_eq(&supplied_padded);

    (lengths_equal & contents_equal).into()
}
