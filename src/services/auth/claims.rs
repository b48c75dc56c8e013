use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Verified identity: who the caller is and which roles they hold.
///
/// Produced by a `CredentialAuthenticator` at login, or rebuilt from a token by
/// the `TokenValidator`. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub username: String,
    pub authorities: BTreeSet<String>,
}

impl AuthenticatedIdentity {
    pub fn new<I, S>(username: impl Into<String>, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: username.into(),
            authorities: authorities.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }
}

/// Access token payload.
///
/// `authorities` is a JSON document stored as a string claim:
/// `[{"authority":"ROLE_ADMIN"},{"authority":"ROLE_USER"}]`.
/// Fields default on the way in so a missing claim surfaces as a claim error
/// instead of a generic parse failure; presence of `sub`/`exp` is enforced by
/// the validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    #[serde(default)]
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorities: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct GrantedAuthority {
    authority: String,
}

/// Serialize a role set into the `authorities` claim value (sorted, so stable).
pub fn encode_authorities(authorities: &BTreeSet<String>) -> Result<String, serde_json::Error> {
    let granted: Vec<GrantedAuthority> = authorities
        .iter()
        .map(|a| GrantedAuthority {
            authority: a.clone(),
        })
        .collect();
    serde_json::to_string(&granted)
}

pub fn decode_authorities(raw: &str) -> Result<BTreeSet<String>, serde_json::Error> {
    let granted: Vec<GrantedAuthority> = serde_json::from_str(raw)?;
    Ok(granted.into_iter().map(|g| g.authority).collect())
}
