//! Session Codec
//!
//! Turns a user id into an opaque `sessionId` cookie value and back. A session
//! value is `cipher(sign({uid, iat, exp, jti}))`: the signer proves the claims
//! were issued here and the cipher hides them from the client.
//!
//! Both the signing secret and the cipher key must stay private. Anyone who
//! holds the two can mint a session for any uid.

use crate::utils::crypto::{CipherError, SymmetricCipher};
use crate::utils::jwt::{Claims, JwtError, TokenSigner};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

/// Default session lifetime in seconds
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 7200;

/// Identity claims recovered from a verified session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub uid: String,
    pub iat: i64,
    pub exp: i64,
}

/// Why a session value was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// No cookie value at all
    Empty,
    /// The cipher layer refused the value
    Undecryptable,
    /// Decrypted, but not a well-formed token or claims set
    Malformed,
    /// Token signature does not match the signing secret
    BadSignature,
    /// Token was valid but its lifetime has passed
    Expired,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InvalidReason::Empty => "empty session value",
            InvalidReason::Undecryptable => "session value could not be decrypted",
            InvalidReason::Malformed => "session token is malformed",
            InvalidReason::BadSignature => "session signature is invalid",
            InvalidReason::Expired => "session has expired",
        };
        f.write_str(text)
    }
}

/// Outcome of checking a session value
#[derive(Debug, Clone, PartialEq)]
pub enum SessionVerdict {
    Verified(Claims),
    Invalid(InvalidReason),
}

impl SessionVerdict {
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(self, SessionVerdict::Verified(_))
    }

    /// Typed claims, if the session verified and carries a uid
    #[must_use]
    pub fn claims(&self) -> Option<SessionClaims> {
        match self {
            SessionVerdict::Verified(payload) => {
                serde_json::from_value(Value::Object(payload.clone())).ok()
            }
            SessionVerdict::Invalid(_) => None,
        }
    }
}

/// Errors raised while issuing a session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to sign session token: {0}")]
    Sign(#[from] JwtError),
    #[error("Failed to encrypt session token: {0}")]
    Encrypt(#[from] CipherError),
}

/// Issues and verifies encrypted session values
///
/// The signer and cipher are injected so tests and alternative deployments
/// can swap either half.
#[derive(Clone)]
pub struct SessionCodec {
    signer: Arc<dyn TokenSigner>,
    cipher: Arc<dyn SymmetricCipher>,
    default_ttl: u64,
}

impl SessionCodec {
    #[must_use]
    pub fn new(signer: Arc<dyn TokenSigner>, cipher: Arc<dyn SymmetricCipher>) -> Self {
        Self {
            signer,
            cipher,
            default_ttl: DEFAULT_SESSION_TTL_SECONDS,
        }
    }

    /// Override the lifetime used by `issue_default`
    #[must_use]
    pub fn with_default_ttl(mut self, ttl_seconds: u64) -> Self {
        self.default_ttl = ttl_seconds;
        self
    }

    #[must_use]
    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    /// Build a cookie value for `uid` that expires after `ttl_seconds`
    ///
    /// # Errors
    ///
    /// Returns an error if signing or encryption fails
    pub fn issue(&self, uid: &str, ttl_seconds: u64) -> Result<String, SessionError> {
        let mut claims = Claims::new();
        claims.insert("uid".to_string(), json!(uid));

        let token = self.signer.sign(&claims, ttl_seconds)?;
        Ok(self.cipher.encrypt(&token)?)
    }

    /// `issue` with the configured default lifetime
    ///
    /// # Errors
    ///
    /// Returns an error if signing or encryption fails
    pub fn issue_default(&self, uid: &str) -> Result<String, SessionError> {
        self.issue(uid, self.default_ttl)
    }

    /// Decrypt and verify a cookie value
    #[must_use]
    pub fn inspect(&self, cookie_value: &str) -> SessionVerdict {
        if cookie_value.is_empty() {
            return SessionVerdict::Invalid(InvalidReason::Empty);
        }

        let token = match self.cipher.decrypt(cookie_value) {
            Ok(token) => token,
            Err(e) => {
                log::debug!("Session decryption failed: {e}");
                return SessionVerdict::Invalid(InvalidReason::Undecryptable);
            }
        };

        match self.signer.verify(&token) {
            Ok(claims) => SessionVerdict::Verified(claims),
            Err(e) => {
                log::debug!("Session token rejected: {e}");
                SessionVerdict::Invalid(match e {
                    JwtError::Expired => InvalidReason::Expired,
                    JwtError::BadSignature => InvalidReason::BadSignature,
                    JwtError::Malformed
                    | JwtError::UnsupportedAlgorithm(_)
                    | JwtError::Serialization(_)
                    | JwtError::Signing(_) => InvalidReason::Malformed,
                })
            }
        }
    }

    /// Whether the cookie value is a live session issued by this codec
    #[must_use]
    pub fn verify(&self, cookie_value: &str) -> bool {
        self.inspect(cookie_value).is_verified()
    }

    /// Payload of a live session, or an empty map
    #[must_use]
    pub fn decode_claims(&self, cookie_value: &str) -> Claims {
        match self.inspect(cookie_value) {
            SessionVerdict::Verified(claims) => claims,
            SessionVerdict::Invalid(_) => Claims::new(),
        }
    }
}

impl fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCodec")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}
