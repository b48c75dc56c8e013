/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - issuer / validator / users (credential check) / products
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - リクエスト毎の認証情報 (RequestIdentity) はここに置かない。request extensions で運ぶ
 */
use std::sync::Arc;

use crate::repos::product_repo::ProductRepo;
use crate::repos::user_repo::UserRepo;
use crate::services::auth::{CredentialAuthenticator, TokenIssuer, TokenValidator};

#[derive(Clone)]
pub struct AppState {
    pub issuer: Arc<TokenIssuer>,
    pub validator: Arc<TokenValidator>,
    pub authenticator: Arc<dyn CredentialAuthenticator>,
    pub users: Arc<UserRepo>,
    pub products: Arc<ProductRepo>,
}

impl AppState {
    pub fn new(issuer: Arc<TokenIssuer>, validator: Arc<TokenValidator>, users: Arc<UserRepo>) -> Self {
        Self {
            issuer,
            validator,
            authenticator: users.clone(),
            users,
            products: Arc::new(ProductRepo::new()),
        }
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use crate::services::auth::SigningKey;
    use crate::services::auth::token_issuer::DEFAULT_TTL_SECONDS;

    pub const TEST_SECRET: &[u8] = b"router-test-secret-0123456789abcdefgh";

    /// State with a fixed key and a store holding `admin/secret` (admin) and `jdoe/secret`.
    pub async fn test_state() -> AppState {
        let key = SigningKey::from_bytes(TEST_SECRET.to_vec()).unwrap();
        let users = Arc::new(UserRepo::new());
        users.create("admin", "secret", true).await.unwrap();
        users.create("jdoe", "secret", false).await.unwrap();

        AppState::new(
            Arc::new(TokenIssuer::new(&key, DEFAULT_TTL_SECONDS)),
            Arc::new(TokenValidator::new(&key)),
            users,
        )
    }
}
