//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::IdentityStrategy;
use crate::infra::{Cache, CatalogProvider, Database, SessionStore};
use crate::services::{
    AuthService, CatalogService, LikeService, ServiceContainer, Services, UserService,
};

/// Request-handling knobs taken from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    pub identity_strategy: IdentityStrategy,
    /// Honor `X-Forwarded-For` / `X-Real-IP`
    pub trust_proxy: bool,
    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,
    /// Session cookie `Max-Age`
    pub session_ttl_seconds: u64,
}

impl From<&Config> for HttpSettings {
    fn from(config: &Config) -> Self {
        Self {
            identity_strategy: config.identity_strategy,
            trust_proxy: config.trust_proxy,
            cookie_secure: config.cookie_secure,
            session_ttl_seconds: config.session_ttl_seconds,
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Catalog service
    pub catalog_service: Arc<dyn CatalogService>,
    /// Like ledger
    pub like_service: Arc<dyn LikeService>,
    pub settings: HttpSettings,
    /// Redis cache, when configured
    pub cache: Option<Arc<Cache>>,
    /// Database handle for health checks
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Create application state from the database and the runtime collaborators.
    pub fn from_config(
        database: Arc<Database>,
        cache: Option<Arc<Cache>>,
        sessions: Arc<dyn SessionStore>,
        provider: Arc<dyn CatalogProvider>,
        config: &Config,
    ) -> Self {
        let container = Services::from_connection(database.get_connection(), sessions, provider);

        Self::new(&container, HttpSettings::from(config))
            .with_cache(cache)
            .with_database(database)
    }

    /// Create application state from any service container.
    pub fn new(services: &dyn ServiceContainer, settings: HttpSettings) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            catalog_service: services.catalog(),
            like_service: services.likes(),
            settings,
            cache: None,
            database: None,
        }
    }

    pub fn with_cache(mut self, cache: Option<Arc<Cache>>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_database(mut self, database: Arc<Database>) -> Self {
        self.database = Some(database);
        self
    }
}
