use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::AuthenticatedIdentity;

use super::RequestIdentity;

/// Handler で認証済み主体を受け取るための extractor
/// validate stage が RequestIdentity を extensions に insert 済みである前提
/// 見つからない場合は 401 を返す
pub struct Identity(pub AuthenticatedIdentity);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestIdentity>()
            .map(|ctx| Identity(ctx.identity().clone()))
            .ok_or(AppError::Unauthorized)
    }
}

/// 公開ルート向け。未認証でも拒否しない
pub struct MaybeIdentity(pub Option<AuthenticatedIdentity>);

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(
            parts
                .extensions
                .get::<RequestIdentity>()
                .map(|ctx| ctx.identity().clone()),
        ))
    }
}
