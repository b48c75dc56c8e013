use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::services::auth::claims::{AccessTokenClaims, AuthenticatedIdentity, decode_authorities};
use crate::services::auth::error::TokenError;
use crate::services::auth::signing_key::SigningKey;

/// HS256 access-token verifier.
///
/// - Only HS256 is accepted; any other `alg` is malformed.
/// - `exp` is checked with zero leeway: a token is dead the second it expires.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenValidator {
    pub fn new(key: &SigningKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            validation,
        }
    }

    /// Verify signature + `exp` and decode the raw claims.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let data = jsonwebtoken::decode::<AccessTokenClaims>(
            token,
            &self.decoding_key,
            &self.validation,
        )?;
        Ok(data.claims)
    }

    /// Verify, then rebuild the identity the token was issued for.
    ///
    /// This is the entry-point for the validate stage.
    pub fn validate(&self, token: &str) -> Result<AuthenticatedIdentity, TokenError> {
        let claims = self.verify(token)?;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::MissingClaim("sub"));
        }
        let raw = claims
            .authorities
            .as_deref()
            .ok_or(TokenError::MissingClaim("authorities"))?;
        let authorities = decode_authorities(raw)
            .map_err(|e| TokenError::Malformed(format!("authorities claim: {e}")))?;

        Ok(AuthenticatedIdentity {
            username: claims.sub,
            authorities,
        })
    }
}
