//! Service Container - Centralized service access.
//!
//! Handlers reach every use case through one `Arc<dyn ServiceContainer>`,
//! so tests can swap in fakes without touching the database.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, CatalogManager, CatalogService, LikeLedger, LikeService,
    UserManager, UserService,
};
use crate::infra::{CatalogProvider, Persistence, SessionStore};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get catalog service
    fn catalog(&self) -> Arc<dyn CatalogService>;

    /// Get like ledger
    fn likes(&self) -> Arc<dyn LikeService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    catalog_service: Arc<dyn CatalogService>,
    like_service: Arc<dyn LikeService>,
}

impl Services {
    /// Assemble a container from already-built services
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        catalog_service: Arc<dyn CatalogService>,
        like_service: Arc<dyn LikeService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            catalog_service,
            like_service,
        }
    }

    /// Wire every service onto one database-backed unit of work
    pub fn from_connection(
        db: Arc<sea_orm::DatabaseConnection>,
        sessions: Arc<dyn SessionStore>,
        provider: Arc<dyn CatalogProvider>,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), sessions)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            catalog_service: Arc::new(CatalogManager::new(uow.clone(), provider)),
            like_service: Arc::new(LikeLedger::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn likes(&self) -> Arc<dyn LikeService> {
        self.like_service.clone()
    }
}
