//! Session Token Issuer/Verifier
//!
//! Tokens are self-contained signed claims, never persisted server-side:
//!
//! ```text
//! base64url(subject:issued_at_ms:expires_at_ms) . base64url(hmac_sha256)
//! ```
//!
//! A token is accepted only if both the signature and the expiry check
//! pass; the signature is verified first, in constant time. There is no
//! revocation list, so a token stays valid until its expiry even after
//! logout or a password change.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::domain::value_object::PublicId;

type HmacSha256 = Hmac<Sha256>;

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Public ID of the authenticated account
    pub subject: PublicId,
    /// Issue timestamp (Unix ms)
    pub issued_at_ms: i64,
    /// Expiry timestamp (Unix ms)
    pub expires_at_ms: i64,
}

/// Token verification errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Token does not have the expected structure
    #[error("Token is malformed")]
    Malformed,

    /// Signature does not match the current secret
    #[error("Token signature is invalid")]
    InvalidSignature,

    /// Token expiry has passed
    #[error("Token has expired")]
    Expired,
}

/// Issues and verifies session tokens with a process-wide secret
#[derive(Clone)]
pub struct TokenIssuer {
    secret: [u8; 32],
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: [u8; 32], ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    /// Issue a token for `subject` expiring after the configured TTL
    pub fn issue(&self, subject: &PublicId) -> String {
        self.issue_at(subject, Utc::now().timestamp_millis())
    }

    fn issue_at(&self, subject: &PublicId, now_ms: i64) -> String {
        let expires_at_ms = now_ms + self.ttl.as_millis() as i64;
        let payload = format!("{}:{}:{}", subject, now_ms, expires_at_ms);
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload.as_bytes());

        let signature = self.sign(payload_b64.as_bytes());

        format!("{}.{}", payload_b64, URL_SAFE_NO_PAD.encode(signature))
    }

    /// Verify a token and return its claims
    ///
    /// The signature is checked before anything in the payload is
    /// trusted, including the expiry.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let (payload_b64, signature_b64) =
            token.split_once('.').ok_or(TokenError::Malformed)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| TokenError::Malformed)?;

        // Constant-time comparison
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::Malformed)?;
        let payload = String::from_utf8(payload_bytes).map_err(|_| TokenError::Malformed)?;

        let claims = Self::parse_payload(&payload)?;

        if Utc::now().timestamp_millis() > claims.expires_at_ms {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }

    fn parse_payload(payload: &str) -> Result<TokenClaims, TokenError> {
        let mut parts = payload.split(':');

        let subject = parts.next().ok_or(TokenError::Malformed)?;
        let issued_at = parts.next().ok_or(TokenError::Malformed)?;
        let expires_at = parts.next().ok_or(TokenError::Malformed)?;
        if parts.next().is_some() {
            return Err(TokenError::Malformed);
        }

        let subject = PublicId::parse_str(subject).map_err(|_| TokenError::Malformed)?;
        let issued_at_ms: i64 = issued_at.parse().map_err(|_| TokenError::Malformed)?;
        let expires_at_ms: i64 = expires_at.parse().map_err(|_| TokenError::Malformed)?;

        Ok(TokenClaims {
            subject,
            issued_at_ms,
            expires_at_ms,
        })
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}
