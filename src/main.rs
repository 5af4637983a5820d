//! Lobby Server: real-time WebSocket hub with cached identity resolution.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use lobby_api::{AppState, build_app};
use lobby_auth::{IdentityResolver, JwtDecoder};
use lobby_cache::SessionCache;
use lobby_core::config::AppConfig;
use lobby_core::error::AppError;
use lobby_database::{
    DatabasePool, IdentityStore, MemoryUserStore, RequestLogRepository, UserRepository,
};
use lobby_realtime::RealtimeEngine;
use lobby_worker::CronScheduler;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from `config/` and `LOBBY__*` environment variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("LOBBY_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.server.environment,
        "Starting Lobby"
    );
    let config = Arc::new(config);

    // ── Step 1: Identity store ───────────────────────────────────
    let (db_pool, identities): (Option<DatabasePool>, Arc<dyn IdentityStore>) =
        if config.database.url.trim().is_empty() {
            tracing::warn!("database.url is empty, using the in-memory identity store");
            (None, Arc::new(MemoryUserStore::new()))
        } else {
            let pool = DatabasePool::connect(&config.database).await?;
            let repo = UserRepository::new(pool.pool().clone());
            (Some(pool), Arc::new(repo))
        };

    // ── Step 2: Session cache + authentication ───────────────────
    let cache = Arc::new(SessionCache::from_config(&config.cache));
    let validator = Arc::new(JwtDecoder::new(&config.auth)?);
    let resolver = Arc::new(IdentityResolver::new(
        validator,
        Arc::clone(&cache),
        Arc::clone(&identities),
    ));
    tracing::info!(algorithm = %config.auth.algorithm, "Authentication initialized");

    // ── Step 3: Realtime engine (starts the heartbeat) ───────────
    let realtime = RealtimeEngine::new(&config.realtime, Arc::clone(&resolver));

    // ── Step 4: Request log persistence ──────────────────────────
    let request_logs = match &db_pool {
        Some(pool) if config.logging.persist_requests => {
            Some(RequestLogRepository::new(pool.pool().clone()))
        }
        Some(_) => {
            tracing::info!("Request log persistence disabled (logging.persist_requests = false)");
            None
        }
        None => None,
    };

    // ── Step 5: Scheduled maintenance ────────────────────────────
    let mut scheduler = if config.worker.enabled {
        let mut scheduler = CronScheduler::new(Arc::clone(&cache), &config.cache).await?;
        if let Some(repo) = &request_logs {
            scheduler = scheduler.with_request_logs(repo.clone(), &config.worker);
        }
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Scheduled maintenance disabled (worker.enabled = false)");
        None
    };

    // ── Step 6: HTTP server ──────────────────────────────────────
    let mut state = AppState::new(
        Arc::clone(&config),
        resolver,
        realtime.clone(),
        identities,
    );
    if let Some(repo) = request_logs {
        state = state.with_request_logs(repo);
    }
    let app = build_app(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(addr = %addr, "Lobby server listening");

    // ── Step 7: Graceful shutdown ────────────────────────────────
    let engine = realtime.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            // Open sockets would otherwise hold the server open.
            engine.shutdown();
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if !realtime.is_shut_down() {
        realtime.shutdown();
    }
    if let Some(scheduler) = scheduler.as_mut() {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler shutdown failed");
        }
    }
    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("Lobby server shut down gracefully");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
