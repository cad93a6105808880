/*
 * Responsibility
 * - Config load → logging/panic-hook init → state build → Router assembly
 * - axum::serve() startup
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;

use crate::{
    api,
    config::Config,
    logging, middleware,
    repos::user_repo::PgUserStore,
    services::auth::JwtVerifier,
    state::AppState,
};

pub async fn run() -> Result<()> {
    let config = Config::from_env()?;

    // The guard keeps the background log writer alive for the whole process.
    let _log_guard = logging::init(&config)?;

    let abort_on_panic = !config.app_env.is_production();
    init_panic_hook(abort_on_panic);

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics via tracing so they are never lost to a hidden stderr.
        tracing::error!(?info, "panic");

        // Development fails fast; production keeps serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }));
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = sqlx::PgPool::connect(&config.database_url).await?;

    let verifier = Arc::new(JwtVerifier::new(
        &config.auth_secret_key,
        config.access_token_leeway_seconds,
    ));
    let users = Arc::new(PgUserStore::new(db.clone()));

    Ok(AppState::new(db, verifier, users))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes())
        .with_state(state);

    let router = middleware::http::apply(router, config);
    middleware::cors::apply(router, config)
}
