//! Infrastructure layer - External systems integration
//!
//! Database connection and repositories, the unit of work, the Redis
//! cache, session storage and the outbound provider gateway.

pub mod cache;
pub mod db;
pub mod provider;
pub mod repositories;
pub mod session_store;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use provider::{CatalogProvider, ProviderError, RobloxGateway};
pub use repositories::{
    ItemRepository, ItemStore, LikeRepository, LikeStore, UserRepository, UserStore,
};
pub use session_store::{MemorySessionStore, RedisSessionStore, SessionStore};
pub use unit_of_work::{
    Persistence, TransactionContext, TxItemRepository, TxLikeRepository, UnitOfWork,
};
