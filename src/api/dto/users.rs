/*
 * Responsibility
 * - Users の request/response DTO
 * - validate() で形式チェック (必須 / 長さ)。重複チェックは repo を見る handler 側
 */
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::dto::field_message;
use crate::repos::user_repo::UserRow;

pub const USERNAME_MIN: usize = 4;
pub const USERNAME_MAX: usize = 12;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    // Only honored on the admin-gated endpoint.
    #[serde(default)]
    pub admin: bool,
}

impl CreateUserRequest {
    /// Field name -> message, at most one message per field.
    pub fn validate(&self) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();

        let len = self.username.chars().count();
        if self.username.trim().is_empty() {
            errors.insert("username".to_string(), field_message("username", "no debe estar vacío"));
        } else if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
            errors.insert(
                "username".to_string(),
                field_message(
                    "username",
                    &format!("el tamaño debe estar entre {USERNAME_MIN} y {USERNAME_MAX}"),
                ),
            );
        }

        if self.password.trim().is_empty() {
            errors.insert("password".to_string(), field_message("password", "no debe estar vacío"));
        }

        errors
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub enabled: bool,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            roles: row.roles.into_iter().collect(),
            enabled: row.enabled,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub authorities: Vec<String>,
}
