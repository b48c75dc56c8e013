use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

/// Why a bearer token was refused (or could not be minted).
///
/// Every variant leads to the same 401 outcome; the variant only feeds the
/// `error` field and the logs.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("token has expired")]
    Expired,
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token is missing required claim '{0}'")]
    MissingClaim(&'static str),
    #[error("failed to sign token")]
    Signing,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::MissingRequiredClaim(claim) if claim == "sub" => Self::MissingClaim("sub"),
            ErrorKind::MissingRequiredClaim(claim) if claim == "exp" => Self::MissingClaim("exp"),
            _ => Self::Malformed(e.to_string()),
        }
    }
}

/// Internal cause of a failed credential check. Never shown to the caller.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("unknown user")]
    UnknownUser,
    #[error("bad password")]
    BadPassword,
    #[error("user is disabled")]
    Disabled,
    #[error("credential backend failure")]
    Backend,
}
