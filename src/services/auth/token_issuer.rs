use jsonwebtoken::{Algorithm, EncodingKey, Header};
use tracing::error;

use crate::services::auth::claims::{AccessTokenClaims, AuthenticatedIdentity, encode_authorities};
use crate::services::auth::error::TokenError;
use crate::services::auth::signing_key::SigningKey;

pub const DEFAULT_TTL_SECONDS: u64 = 3600;

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Signs HS256 access tokens for verified identities.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl_seconds: u64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(key: &SigningKey, ttl_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn issue(&self, identity: &AuthenticatedIdentity) -> Result<IssuedToken, TokenError> {
        self.issue_at(identity, chrono::Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (unix seconds).
    pub fn issue_at(
        &self,
        identity: &AuthenticatedIdentity,
        now: i64,
    ) -> Result<IssuedToken, TokenError> {
        let authorities = encode_authorities(&identity.authorities).map_err(|e| {
            error!(error = %e, "failed to serialize authorities claim");
            TokenError::Signing
        })?;

        let ttl = i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX);
        let exp = now.saturating_add(ttl);
        let claims = AccessTokenClaims {
            sub: identity.username.clone(),
            authorities: Some(authorities),
            username: Some(identity.username.clone()),
            iat: now,
            exp,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        let token = jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            TokenError::Signing
        })?;

        Ok(IssuedToken {
            token,
            issued_at: now,
            expires_at: exp,
        })
    }
}
