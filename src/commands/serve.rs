//! Serve command - Starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::{Config, SessionBackend};
use crate::errors::{AppError, AppResult};
use crate::infra::{
    Cache, CatalogProvider, Database, MemorySessionStore, RedisSessionStore, RobloxGateway,
    SessionStore,
};

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(300);

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }

    // Initialize database (runs pending migrations)
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let db = Arc::new(db);
    tracing::info!("Database connected");

    // Redis is optional; it backs persistent sessions and auth rate limiting
    let cache = match config.redis_url.as_deref() {
        Some(url) => {
            let cache = Cache::connect(url)
                .await
                .map_err(|e| AppError::internal(format!("Redis connection failed: {}", e)))?;
            Some(Arc::new(cache))
        }
        None => None,
    };

    let sessions = session_store(&config, cache.as_deref())?;

    let provider: Arc<dyn CatalogProvider> = Arc::new(
        RobloxGateway::new(&config.provider)
            .map_err(|e| AppError::internal(format!("Provider client setup failed: {}", e)))?,
    );

    let app_state = AppState::from_config(db, cache, sessions, provider, &config);
    let app = create_router(app_state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!(
        identity_strategy = config.identity_strategy.as_str(),
        trust_proxy = config.trust_proxy,
        "Server running on http://{}",
        addr
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

fn session_store(config: &Config, cache: Option<&Cache>) -> AppResult<Arc<dyn SessionStore>> {
    match (config.session_backend, cache) {
        (SessionBackend::Redis, Some(cache)) => {
            tracing::info!("Sessions stored in Redis");
            Ok(Arc::new(RedisSessionStore::new(
                cache.clone(),
                config.session_ttl_seconds,
            )))
        }
        (SessionBackend::Redis, None) => Err(AppError::internal(
            "SESSION_STORE=redis requires REDIS_URL",
        )),
        (SessionBackend::Memory, _) => {
            tracing::info!("Sessions stored in memory; they will not survive a restart");
            let store = Arc::new(MemorySessionStore::new(Duration::from_secs(
                config.session_ttl_seconds,
            )));
            spawn_session_purge(store.clone());
            Ok(store)
        }
    }
}

fn spawn_session_purge(store: Arc<MemorySessionStore>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = store.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "Expired sessions purged");
            }
        }
    });
}
