/*
 * Responsibility
 * - /api 配下の URL 構造を定義
 * - 認可 (gate) が必要なルートはここで宣言する。gate の無いルートは公開
 *   - GET  /users           公開
 *   - POST /users/register  公開
 *   - POST /users           ROLE_ADMIN
 *   - GET  /users/me        認証済みなら誰でも
 *   - /products 以下        すべて認証済みなら誰でも
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::products::{
    create_product, delete_product, get_product, list_products, update_product,
};
use crate::api::handlers::users::{create_user, list_users, me, register_user};
use crate::middleware::auth::gate::{self, RouteAccess};
use crate::services::auth::roles::ROLE_ADMIN;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(list_users).merge(gate::require(
                post(create_user),
                RouteAccess::any_role([ROLE_ADMIN]),
            )),
        )
        .route("/users/register", post(register_user))
        .route("/users/me", gate::require(get(me), RouteAccess::Authenticated))
        .route(
            "/products",
            gate::require(
                get(list_products).post(create_product),
                RouteAccess::Authenticated,
            ),
        )
        .route(
            "/products/{id}",
            gate::require(
                get(get_product).put(update_product).delete(delete_product),
                RouteAccess::Authenticated,
            ),
        )
}
