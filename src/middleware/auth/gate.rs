//! Per-route authorization gate.
//!
//! Reads the RequestIdentity installed by the validate stage. Routes without a
//! gate are public.
//!
//! ```ignore
//! .route("/users", get(list_users).merge(gate::require(
//!     post(create_user),
//!     RouteAccess::any_role([ROLE_ADMIN]),
//! )))
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::extractors::RequestIdentity;
use crate::error::AppError;
use crate::services::auth::AuthenticatedIdentity;

#[derive(Debug, Clone)]
pub enum RouteAccess {
    /// Any verified identity.
    Authenticated,
    /// A verified identity holding at least one of these roles.
    AnyRole(Arc<BTreeSet<String>>),
}

impl RouteAccess {
    pub fn any_role<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyRole(Arc::new(roles.into_iter().map(Into::into).collect()))
    }

    pub fn required_roles(&self) -> BTreeSet<String> {
        match self {
            Self::Authenticated => BTreeSet::new(),
            Self::AnyRole(roles) => roles.as_ref().clone(),
        }
    }

    /// 401 without identity, 403 when no required role is held.
    pub fn check(&self, identity: Option<&AuthenticatedIdentity>) -> Result<(), AppError> {
        let identity = identity.ok_or(AppError::Unauthorized)?;
        match self {
            Self::Authenticated => Ok(()),
            Self::AnyRole(roles) if roles.iter().any(|r| identity.has_authority(r)) => Ok(()),
            Self::AnyRole(_) => Err(AppError::Forbidden),
        }
    }
}

/// Put `access` in front of every handler of `method_router`.
pub fn require<S>(method_router: MethodRouter<S>, access: RouteAccess) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    method_router.route_layer(middleware::from_fn_with_state(access, gate))
}

async fn gate(
    State(access): State<RouteAccess>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let identity = req
        .extensions()
        .get::<RequestIdentity>()
        .map(RequestIdentity::identity);

    if let Err(err) = access.check(identity) {
        tracing::warn!(
            path = %req.uri().path(),
            username = identity.map(|i| i.username.as_str()).unwrap_or("-"),
            required = ?access.required_roles(),
            "access denied"
        );
        return Err(err);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_checks() {
        let admin = AuthenticatedIdentity::new("admin", ["ROLE_USER", "ROLE_ADMIN"]);
        let user = AuthenticatedIdentity::new("jdoe", ["ROLE_USER"]);
        let admin_only = RouteAccess::any_role(["ROLE_ADMIN"]);

        assert!(admin_only.check(Some(&admin)).is_ok());
        assert!(matches!(admin_only.check(Some(&user)), Err(AppError::Forbidden)));
        assert!(matches!(admin_only.check(None), Err(AppError::Unauthorized)));

        assert!(RouteAccess::Authenticated.check(Some(&user)).is_ok());
        assert!(matches!(
            RouteAccess::Authenticated.check(None),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn required_roles_are_reported() {
        assert!(RouteAccess::Authenticated.required_roles().is_empty());
        assert_eq!(
            RouteAccess::any_role(["ROLE_ADMIN", "ROLE_OPS"]).required_roles(),
            BTreeSet::from(["ROLE_ADMIN".to_string(), "ROLE_OPS".to_string()])
        );
    }
}
