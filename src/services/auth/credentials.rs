use async_trait::async_trait;
use serde::Deserialize;

use crate::services::auth::claims::AuthenticatedIdentity;
use crate::services::auth::error::CredentialError;

/// Login request body. Lives only for the duration of one login attempt.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Checks a username/password pair against whatever stores the password hashes.
#[async_trait]
pub trait CredentialAuthenticator: Send + Sync {
    async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedIdentity, CredentialError>;
}
