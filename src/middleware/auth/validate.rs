//! Validate stage: bearer token → RequestIdentity in request extensions.
//!
//! - No `Authorization` header, or one without the `Bearer ` prefix: the request
//!   continues with no identity (public routes stay reachable; the gate rejects
//!   where needed).
//! - `Bearer <token>`: verify with the process signing key. Success installs the
//!   identity for this request only; any failure (malformed, bad signature,
//!   expired, missing claim) ends the request with 401.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::api::extractors::RequestIdentity;
use crate::services::auth::{AuthenticatedIdentity, TokenError, TokenValidator};
use crate::state::AppState;

pub const BEARER_PREFIX: &str = "Bearer ";

const INVALID_TOKEN_MESSAGE: &str = "El token JWT es invalido!";

/// Terminal state of the validate stage for one request.
#[derive(Debug)]
pub enum ValidationOutcome {
    PassThrough,
    Identified(AuthenticatedIdentity),
    Rejected(TokenError),
}

/// Decide what to do with a request, from its headers alone.
pub fn inspect(validator: &TokenValidator, headers: &HeaderMap) -> ValidationOutcome {
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return ValidationOutcome::PassThrough;
    };

    let Some(token) = value.strip_prefix(BEARER_PREFIX) else {
        return ValidationOutcome::PassThrough;
    };

    match validator.validate(token) {
        Ok(identity) => ValidationOutcome::Identified(identity),
        Err(err) => ValidationOutcome::Rejected(err),
    }
}

pub(super) async fn validate_stage(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match inspect(&state.validator, req.headers()) {
        ValidationOutcome::PassThrough => {
            tracing::debug!(path = %req.uri().path(), "no bearer token, continuing unauthenticated");
            next.run(req).await
        }
        ValidationOutcome::Identified(identity) => {
            tracing::debug!(username = %identity.username, "bearer token accepted");
            // validate stage → gate / extractor への受け渡し
            req.extensions_mut().insert(RequestIdentity(identity));
            next.run(req).await
        }
        ValidationOutcome::Rejected(err) => {
            tracing::warn!(error = %err, path = %req.uri().path(), "bearer token rejected");
            TokenRejection(err).into_response()
        }
    }
}

#[derive(Serialize)]
struct TokenRejectionBody {
    error: String,
    message: &'static str,
}

/// 401 with `{"error": <cause>, "message": "El token JWT es invalido!"}`.
pub struct TokenRejection(pub TokenError);

impl IntoResponse for TokenRejection {
    fn into_response(self) -> Response {
        let body = TokenRejectionBody {
            error: self.0.to_string(),
            message: INVALID_TOKEN_MESSAGE,
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}
