/*
 * Responsibility
 * - users の保存 (プロセス内メモリ。永続化はこのサービスの責務外)
 * - list / create / exists / find を提供
 * - CredentialAuthenticator として login 時の資格情報チェックを担う
 */
use std::collections::BTreeSet;
use std::sync::LazyLock;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::services::auth::claims::AuthenticatedIdentity;
use crate::services::auth::credentials::CredentialAuthenticator;
use crate::services::auth::error::CredentialError;
use crate::services::auth::password::{self, PasswordError};
use crate::services::auth::roles;

// Checked against when the username is unknown, so that path costs one argon2
// verification like a wrong password does.
static UNKNOWN_USER_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| password::hash_password("unknown-user").ok());

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub roles: BTreeSet<String>,
    pub enabled: bool,
}

#[derive(Debug, Default)]
pub struct UserRepo {
    // Insertion order is the listing order.
    users: RwLock<Vec<UserRow>>,
}

impl UserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> Vec<UserRow> {
        self.users.read().await.clone()
    }

    pub async fn find_by_username(&self, username: &str) -> Option<UserRow> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    pub async fn exists_by_username(&self, username: &str) -> bool {
        self.users.read().await.iter().any(|u| u.username == username)
    }

    /// Hash the password and store a new enabled user.
    ///
    /// Roles: `ROLE_USER`, plus `ROLE_ADMIN` when `admin` is set.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        admin: bool,
    ) -> Result<UserRow, RepoError> {
        let plain = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plain))
            .await
            .map_err(|_| RepoError::Password(PasswordError::HashingFailed))??;

        let row = UserRow {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash,
            roles: roles::default_roles(admin)
                .into_iter()
                .map(str::to_string)
                .collect(),
            enabled: true,
        };

        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == row.username) {
            return Err(RepoError::Conflict);
        }
        users.push(row.clone());

        Ok(row)
    }
}

#[async_trait]
impl CredentialAuthenticator for UserRepo {
    async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedIdentity, CredentialError> {
        let user = self.find_by_username(username).await;

        let plain = password.to_string();
        let hash = user.as_ref().map(|u| u.password_hash.clone());
        let checked = tokio::task::spawn_blocking(move || match hash {
            Some(hash) => password::verify_password(&plain, &hash),
            None => {
                if let Some(dummy) = UNKNOWN_USER_HASH.as_deref() {
                    let _ = password::verify_password(&plain, dummy);
                }
                Err(PasswordError::VerificationFailed)
            }
        })
        .await
        .map_err(|_| CredentialError::Backend)?;

        let Some(user) = user else {
            return Err(CredentialError::UnknownUser);
        };
        checked.map_err(|e| match e {
            PasswordError::VerificationFailed => CredentialError::BadPassword,
            _ => CredentialError::Backend,
        })?;

        if !user.enabled {
            return Err(CredentialError::Disabled);
        }

        Ok(AuthenticatedIdentity::new(user.username, user.roles))
    }
}

#[cfg(test)]
impl UserRepo {
    pub async fn set_enabled(&self, username: &str, enabled: bool) {
        if let Some(user) = self
            .users
            .write()
            .await
            .iter_mut()
            .find(|u| u.username == username)
        {
            user.enabled = enabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    async fn average_verify(repo: &UserRepo, username: &str, rounds: u32) -> Duration {
        let started = Instant::now();
        for _ in 0..rounds {
            assert!(repo.verify(username, "wrong").await.is_err());
        }
        started.elapsed() / rounds
    }

    #[tokio::test]
    async fn create_assigns_roles_and_hashes_password() {
        let repo = UserRepo::new();
        let admin = repo.create("admin", "secret", true).await.unwrap();
        let user = repo.create("jdoe", "secret", false).await.unwrap();

        assert_eq!(
            admin.roles,
            BTreeSet::from(["ROLE_ADMIN".to_string(), "ROLE_USER".to_string()])
        );
        assert_eq!(user.roles, BTreeSet::from(["ROLE_USER".to_string()]));
        assert_ne!(admin.password_hash, "secret");
        assert!(admin.enabled);

        let names: Vec<_> = repo.list().await.into_iter().map(|u| u.username).collect();
        assert_eq!(names, vec!["admin", "jdoe"]);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let repo = UserRepo::new();
        repo.create("admin", "secret", true).await.unwrap();

        assert!(repo.exists_by_username("admin").await);
        assert!(matches!(
            repo.create("admin", "other", false).await,
            Err(RepoError::Conflict)
        ));
    }

    #[tokio::test]
    async fn verify_distinguishes_causes_internally() {
        let repo = UserRepo::new();
        repo.create("admin", "secret", true).await.unwrap();

        let identity = repo.verify("admin", "secret").await.unwrap();
        assert_eq!(identity.username, "admin");
        assert!(identity.has_authority("ROLE_ADMIN"));

        assert!(matches!(
            repo.verify("admin", "wrong").await,
            Err(CredentialError::BadPassword)
        ));
        assert!(matches!(
            repo.verify("nobody", "secret").await,
            Err(CredentialError::UnknownUser)
        ));

        repo.set_enabled("admin", false).await;
        assert!(matches!(
            repo.verify("admin", "secret").await,
            Err(CredentialError::Disabled)
        ));
    }

    #[tokio::test]
    async fn unknown_user_costs_a_password_check() {
        let repo = UserRepo::new();
        repo.create("admin", "secret", true).await.unwrap();

        // Warm both paths, including the lazily built placeholder hash.
        average_verify(&repo, "ghost", 1).await;
        average_verify(&repo, "admin", 1).await;

        let bad_password = average_verify(&repo, "admin", 5).await;
        let unknown_user = average_verify(&repo, "ghost", 5).await;

        assert!(
            unknown_user * 4 >= bad_password,
            "unknown user {unknown_user:?} vs bad password {bad_password:?}"
        );
    }
}
