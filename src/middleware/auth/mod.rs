//! Stateless bearer authentication pipeline.
//!
//! Two independent stages, chained explicitly by [`apply`]:
//! 1. issue stage (`login`): `POST /login` → token
//! 2. validate stage (`validate`): `Authorization: Bearer` → RequestIdentity
//!
//! `gate` is applied per route, after routing.

pub mod gate;
pub mod login;
pub mod validate;

use axum::{Router, middleware};

use crate::state::AppState;

/// Wrap `router` with the issue stage (outer) and the validate stage (inner).
///
/// 例：
/// ```ignore
/// let app = Router::new().nest("/api", api::routes()).with_state(state.clone());
/// let app = middleware::auth::apply(app, state);
/// ```
pub fn apply(router: Router, state: AppState) -> Router {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    // layer は後から足したものが外側になる
    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            validate::validate_stage,
        ))
        .layer(middleware::from_fn_with_state(state, login::login_stage))
}
