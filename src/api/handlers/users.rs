/*
 * Responsibility
 * - /api/users 系 handler
 * - Json を extractor で受け、DTO validation → repo 呼び出し
 * - 認可は routes 側の gate で済んでいる前提。handler は Identity を監査ログに使うだけ
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::dto::field_message,
    api::dto::users::{CreateUserRequest, MeResponse, UserResponse},
    api::extractors::{Identity, JsonBody, MaybeIdentity},
    error::AppError,
    repos::error::RepoError,
    state::AppState,
};

pub async fn list_users(
    State(state): State<AppState>,
    MaybeIdentity(caller): MaybeIdentity,
) -> Json<Vec<UserResponse>> {
    tracing::debug!(
        caller = caller.as_ref().map(|c| c.username.as_str()).unwrap_or("anonymous"),
        "listing users"
    );
    let users = state.users.list().await;
    Json(users.into_iter().map(UserResponse::from).collect())
}

/// Admin-only: may create another admin.
pub async fn create_user(
    State(state): State<AppState>,
    Identity(caller): Identity,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    tracing::info!(by = %caller.username, username = %req.username, admin = req.admin, "creating user");
    save(&state, req).await
}

/// Public self-registration. Never grants admin.
pub async fn register_user(
    State(state): State<AppState>,
    JsonBody(mut req): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    req.admin = false;
    save(&state, req).await
}

pub async fn me(Identity(caller): Identity) -> Json<MeResponse> {
    Json(MeResponse {
        username: caller.username,
        authorities: caller.authorities.into_iter().collect(),
    })
}

async fn save(
    state: &AppState,
    req: CreateUserRequest,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let mut errors = req.validate();
    if !errors.contains_key("username") && state.users.exists_by_username(&req.username).await {
        errors.insert(
            "username".to_string(),
            field_message("username", "ya existe en la base de datos!"),
        );
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let row = state
        .users
        .create(&req.username, &req.password, req.admin)
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration of the same name.
            RepoError::Conflict => AppError::Conflict,
            other => {
                tracing::error!(error = %other, "user_repo::create failed");
                AppError::from(other)
            }
        })?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(row))))
}
