//! Issue stage: `POST /login` credentials → signed access token.
//!
//! Intercepts the login request before routing. Every other request is passed
//! on untouched. A body that cannot be read as credentials counts as a failed
//! login.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderValue, Method, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::error::AppError;
use crate::middleware::auth::validate::BEARER_PREFIX;
use crate::services::auth::token_issuer::IssuedToken;
use crate::services::auth::{
    AuthenticatedIdentity, CredentialAuthenticator, Credentials, TokenIssuer,
};
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/login";

const MAX_LOGIN_BODY: usize = 16 * 1024;
const LOGIN_FAILED_MESSAGE: &str = "Error en la autenticacion username o password incorrectos!";
// Same cause for unknown user, wrong password and disabled account.
const LOGIN_FAILED_CAUSE: &str = "Bad credentials";

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token could not be issued")]
    Internal,
}

/// Check credentials and mint a token for the resulting identity.
pub async fn issue(
    issuer: &TokenIssuer,
    authenticator: &dyn CredentialAuthenticator,
    credentials: &Credentials,
) -> Result<(IssuedToken, AuthenticatedIdentity), LoginError> {
    let identity = authenticator
        .verify(&credentials.username, &credentials.password)
        .await
        .map_err(|err| {
            tracing::warn!(username = %credentials.username, cause = %err, "login failed");
            LoginError::InvalidCredentials
        })?;

    let issued = issuer
        .issue(&identity)
        .map_err(|_| LoginError::Internal)?;

    Ok((issued, identity))
}

pub(super) async fn login_stage(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.method() != Method::POST || req.uri().path() != LOGIN_PATH {
        return next.run(req).await;
    }

    let credentials = match axum::body::to_bytes(req.into_body(), MAX_LOGIN_BODY).await {
        Ok(bytes) => serde_json::from_slice::<Credentials>(&bytes).ok(),
        Err(_) => None,
    };
    let Some(credentials) = credentials else {
        tracing::warn!("login body is not a credentials document");
        return LoginFailure.into_response();
    };

    match issue(&state.issuer, state.authenticator.as_ref(), &credentials).await {
        Ok((issued, identity)) => {
            tracing::info!(
                username = %identity.username,
                expires_at = issued.expires_at,
                "login succeeded"
            );
            LoginSuccess::new(issued, identity).into_response()
        }
        Err(LoginError::InvalidCredentials) => LoginFailure.into_response(),
        Err(LoginError::Internal) => AppError::Internal.into_response(),
    }
}

#[derive(Debug, Serialize)]
struct LoginSuccessBody {
    token: String,
    username: String,
    message: String,
}

/// 200 + `Authorization: Bearer <token>` + `{token, username, message}`.
pub struct LoginSuccess {
    issued: IssuedToken,
    identity: AuthenticatedIdentity,
}

impl LoginSuccess {
    pub fn new(issued: IssuedToken, identity: AuthenticatedIdentity) -> Self {
        Self { issued, identity }
    }
}

impl IntoResponse for LoginSuccess {
    fn into_response(self) -> Response {
        let Ok(bearer) = HeaderValue::from_str(&format!("{BEARER_PREFIX}{}", self.issued.token))
        else {
            return AppError::Internal.into_response();
        };

        let username = self.identity.username;
        let body = LoginSuccessBody {
            message: format!("Hola {username} has iniciado sesion con exito!"),
            token: self.issued.token,
            username,
        };

        (
            StatusCode::OK,
            [(header::AUTHORIZATION, bearer)],
            Json(body),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
struct LoginFailureBody {
    message: &'static str,
    error: &'static str,
}

/// 401 with a body that never reveals why the login failed.
pub struct LoginFailure;

impl IntoResponse for LoginFailure {
    fn into_response(self) -> Response {
        let body = LoginFailureBody {
            message: LOGIN_FAILED_MESSAGE,
            error: LOGIN_FAILED_CAUSE,
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}
