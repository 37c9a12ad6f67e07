// HS256 JWT signing and verification for session tokens
use crate::utils::crypto::{hmac_sha256, verify_hmac_sha256, CipherError};
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Claims object carried in a token payload
pub type Claims = Map<String, Value>;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Invalid JWT format")]
    Malformed,
    #[error("Unsupported JWT algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("JWT signature verification failed")]
    BadSignature,
    #[error("JWT has expired")]
    Expired,
    #[error("Failed to serialize JWT: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to sign JWT: {0}")]
    Signing(#[from] CipherError),
}

/// Decoded but unverified token parts, for inspection only
#[derive(Debug, Clone)]
pub struct JwtParts {
    pub header: Value,
    pub payload: Claims,
}

/// Signs claims into a token and verifies tokens back into claims
pub trait TokenSigner: Send + Sync {
    /// Sign `payload`, adding `iat`, `exp` and `jti`
    ///
    /// # Errors
    ///
    /// Returns an error if the header or payload cannot be serialized, or
    /// the signing key is rejected
    fn sign(&self, payload: &Claims, expires_in_seconds: u64) -> Result<String, JwtError>;

    /// Verify signature and expiry, returning the payload
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed, uses another algorithm,
    /// carries a bad signature, or has expired
    fn verify(&self, token: &str) -> Result<Claims, JwtError>;
}

/// HMAC-SHA256 (HS256) token signer
#[derive(Clone)]
pub struct HmacJwtSigner {
    secret: Vec<u8>,
}

impl HmacJwtSigner {
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            secret: secret.to_vec(),
        }
    }
}

impl std::fmt::Debug for HmacJwtSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacJwtSigner").finish_non_exhaustive()
    }
}

impl TokenSigner for HmacJwtSigner {
    fn sign(&self, payload: &Claims, expires_in_seconds: u64) -> Result<String, JwtError> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(expires_in_seconds).unwrap_or(i64::MAX - now);

        let mut claims = payload.clone();
        claims.insert("iat".to_string(), json!(now));
        claims.insert("exp".to_string(), json!(now.saturating_add(ttl)));
        claims.insert(
            "jti".to_string(),
            json!(uuid::Uuid::new_v4().simple().to_string()),
        );

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let header_b64 = general_purpose::URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
        let payload_b64 = general_purpose::URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);

        let message = format!("{header_b64}.{payload_b64}");
        let signature = hmac_sha256(&self.secret, message.as_bytes())?;
        let signature_b64 = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        Ok(format!("{message}.{signature_b64}"))
    }

    fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let parts = analyse_jwt(token)?;

        let alg = parts.header.get("alg").and_then(Value::as_str).unwrap_or("");
        if alg != "HS256" {
            return Err(JwtError::UnsupportedAlgorithm(alg.to_string()));
        }

        let (message, signature_b64) = token.rsplit_once('.').ok_or(JwtError::Malformed)?;
        let signature = general_purpose::URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| JwtError::Malformed)?;

        if !verify_hmac_sha256(&self.secret, message.as_bytes(), &signature) {
            return Err(JwtError::BadSignature);
        }

        let exp = parts
            .payload
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or(JwtError::Malformed)?;
        if Utc::now().timestamp() >= exp {
            return Err(JwtError::Expired);
        }

        Ok(parts.payload)
    }
}

/// Split and decode a token without checking its signature
///
/// # Errors
///
/// Returns an error if the token does not have three base64url JSON parts
pub fn analyse_jwt(token: &str) -> Result<JwtParts, JwtError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(JwtError::Malformed);
    }

    let decode = |segment: &str| -> Result<Value, JwtError> {
        let bytes = general_purpose::URL_SAFE_NO_PAD
            .decode(segment)
            .map_err(|_| JwtError::Malformed)?;
        serde_json::from_slice(&bytes).map_err(|_| JwtError::Malformed)
    };

    let header = decode(parts[0])?;
    let Value::Object(payload) = decode(parts[1])? else {
        return Err(JwtError::Malformed);
    };

    Ok(JwtParts { header, payload })
}
