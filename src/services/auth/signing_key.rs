/*
 * Responsibility
 * - HS256 用の対称鍵 (SigningKey) を保持する
 * - 起動時に一度だけ生成し、以後は不変。Issuer / Validator の両方に参照で渡す
 * - 鍵の中身は Debug / ログに出さない
 */
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use thiserror::Error;

/// HMAC-SHA256 requires at least as many key bytes as the digest size.
pub const MIN_KEY_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum SigningKeyError {
    #[error("signing key must be at least {MIN_KEY_BYTES} bytes (got {0})")]
    TooShort(usize),
    #[error("signing key is not valid base64url")]
    Encoding,
    #[error("os random source unavailable")]
    Rng,
}

/// Process-wide symmetric secret shared by the token issuer and validator.
#[derive(Clone)]
pub struct SigningKey {
    bytes: Vec<u8>,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("SigningKey")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl SigningKey {
    /// Fresh 256-bit key from the OS RNG. Tokens signed with it die with the process.
    pub fn generate() -> Result<Self, SigningKeyError> {
        let mut bytes = [0u8; MIN_KEY_BYTES];
        getrandom::fill(&mut bytes).map_err(|_| SigningKeyError::Rng)?;
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, SigningKeyError> {
        let bytes = bytes.into();
        if bytes.len() < MIN_KEY_BYTES {
            return Err(SigningKeyError::TooShort(bytes.len()));
        }
        Ok(Self { bytes })
    }

    /// Externally fixed key (`JWT_SECRET`), URL-safe base64 without padding.
    pub fn from_base64url(encoded: &str) -> Result<Self, SigningKeyError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded.trim().trim_end_matches('='))
            .map_err(|_| SigningKeyError::Encoding)?;
        Self::from_bytes(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
