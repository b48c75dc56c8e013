/// Factory: build the signing key and the token services from application `Config`.
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{SigningKey, TokenIssuer, TokenValidator};

pub struct TokenServices {
    pub issuer: Arc<TokenIssuer>,
    pub validator: Arc<TokenValidator>,
}

pub fn build_token_services(config: &Config) -> Result<TokenServices, AppError> {
    let key = match config.jwt_secret.as_deref() {
        Some(secret) => {
            let key = SigningKey::from_base64url(secret).map_err(|e| {
                error!(error = %e, "JWT_SECRET rejected");
                AppError::Internal
            })?;
            info!("using signing key from JWT_SECRET");
            key
        }
        None => {
            let key = SigningKey::generate().map_err(|e| {
                error!(error = %e, "failed to generate signing key");
                AppError::Internal
            })?;
            warn!("generated a new signing key; tokens issued before this start are now invalid");
            key
        }
    };

    Ok(TokenServices {
        issuer: Arc::new(TokenIssuer::new(&key, config.access_token_ttl_seconds)),
        validator: Arc::new(TokenValidator::new(&key)),
    })
}
