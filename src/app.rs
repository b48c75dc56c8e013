/*
 * Responsibility
 * - tracing / panic hook 初期化
 * - Config読み込み → 依存生成 (signing key, issuer, validator, user store) → Router 組み立て
 * - Middleware の適用 (auth pipeline → HTTP layers → CORS)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::handlers::health::health;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware;
use crate::repos::user_repo::UserRepo;
use crate::services::auth::build_token_services;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,crud_auth=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state);
    let app = middleware::http::apply(app, &config.http_limits);
    let app = middleware::cors::apply(app, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState, AppError> {
    // Process-level services. The signing key is created here once and only
    // handed to the issuer and validator.
    let tokens = build_token_services(config)?;
    tracing::info!(ttl_seconds = tokens.issuer.ttl_seconds(), "token services ready");

    let users = Arc::new(UserRepo::new());
    if let Some(seed) = &config.seed_admin {
        users
            .create(&seed.username, &seed.password, true)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to seed admin user");
                AppError::from(e)
            })?;
        tracing::info!(username = %seed.username, "seeded admin user");
    }

    Ok(AppState::new(tokens.issuer, tokens.validator, users))
}

/// Routes + auth pipeline. Transport layers (trace, CORS, ...) are added by `run`.
pub fn build_router(state: AppState) -> Router {
    async fn not_found() -> AppError {
        AppError::NotFound
    }

    let router = Router::new()
        .route("/health", get(health))
        .nest("/api", api::routes())
        // Explicit fallback so unmatched paths (including /login) pass through the auth layers.
        .fallback(not_found)
        .with_state(state.clone());

    middleware::auth::apply(router, state)
}
