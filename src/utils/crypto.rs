// Symmetric encryption and random token helpers for session cookies

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Nonce size for AES-256-GCM encryption (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Encryption key size for AES-256 (256 bits)
pub const ENCRYPTION_KEY_SIZE: usize = 32;

type HmacSha256 = Hmac<Sha256>;

/// Errors raised by the cookie cipher
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("Failed to decode base64 data")]
    Encoding,
    #[error("Invalid data length")]
    Length,
    #[error("AES encryption failed")]
    Encrypt,
    #[error("AES decryption failed")]
    Decrypt,
    #[error("Decrypted data is not valid UTF-8")]
    Utf8,
    #[error("Invalid HMAC key")]
    MacKey,
}

/// Symmetric cipher applied on top of the signed session token
///
/// Implementations must be deterministic in what they accept: anything
/// `encrypt` produces, `decrypt` with the same key restores.
pub trait SymmetricCipher: Send + Sync {
    /// Encrypt a UTF-8 plaintext into an opaque, cookie-safe string
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying cipher fails
    fn encrypt(&self, plaintext: &str) -> Result<String, CipherError>;

    /// Reverse `encrypt`
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid base64, is too short,
    /// fails authentication, or does not decrypt to UTF-8
    fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError>;
}

/// AES-256-GCM cipher with a random nonce per message
///
/// Output layout is `base64url(nonce || ciphertext || tag)` without padding.
#[derive(Clone)]
pub struct AesGcmCipher {
    key: [u8; ENCRYPTION_KEY_SIZE],
}

impl AesGcmCipher {
    /// Build a cipher from arbitrary key material
    #[must_use]
    pub fn new(key_material: &[u8]) -> Self {
        Self {
            key: derive_encryption_key(key_material),
        }
    }

    #[must_use]
    pub fn key(&self) -> &[u8; ENCRYPTION_KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for AesGcmCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmCipher").finish_non_exhaustive()
    }
}

impl SymmetricCipher for AesGcmCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::Encrypt)?;

        let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);

        Ok(general_purpose::URL_SAFE_NO_PAD.encode(&combined))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError> {
        let combined = general_purpose::URL_SAFE_NO_PAD
            .decode(ciphertext)
            .map_err(|_| CipherError::Encoding)?;

        if combined.len() <= NONCE_SIZE {
            return Err(CipherError::Length);
        }

        let (nonce_bytes, sealed) = combined.split_at(NONCE_SIZE);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), sealed)
            .map_err(|_| CipherError::Decrypt)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::Utf8)
    }
}

/// Derive a 32-byte AES key from input key material
///
/// Material that is already exactly 32 bytes is used as-is; anything else is
/// hashed with SHA-256 so short or long secrets still map onto the full key
/// space.
#[must_use]
pub fn derive_encryption_key(input_key: &[u8]) -> [u8; ENCRYPTION_KEY_SIZE] {
    let mut encryption_key = [0u8; ENCRYPTION_KEY_SIZE];
    if input_key.len() == ENCRYPTION_KEY_SIZE {
        encryption_key.copy_from_slice(input_key);
    } else {
        encryption_key.copy_from_slice(&Sha256::digest(input_key));
    }
    encryption_key
}

/// HMAC-SHA256 of `message` under `secret`
///
/// # Errors
///
/// Returns an error if the MAC rejects the key
pub fn hmac_sha256(secret: &[u8], message: &[u8]) -> Result<Vec<u8>, CipherError> {
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(secret).map_err(|_| CipherError::MacKey)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Constant-time check of an HMAC-SHA256 signature
#[must_use]
pub fn verify_hmac_sha256(secret: &[u8], message: &[u8], signature: &[u8]) -> bool {
    match <HmacSha256 as Mac>::new_from_slice(secret) {
        Ok(mut mac) => {
            mac.update(message);
            mac.verify_slice(signature).is_ok()
        }
        Err(_) => false,
    }
}

/// Short random hex fingerprint, used as the default OAuth2 `state`
#[must_use]
pub fn generate_fingerprint(length: usize) -> String {
    let mut bytes = vec![0u8; length.div_ceil(2)];
    rand::rng().fill_bytes(&mut bytes);
    let mut hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    hex.truncate(length);
    hex
}

/// Generate a random secret suitable for signing or cipher keys
#[must_use]
pub fn generate_secret() -> String {
    let mut secret = [0u8; ENCRYPTION_KEY_SIZE];
    rand::rng().fill_bytes(&mut secret);
    general_purpose::STANDARD.encode(secret)
}
