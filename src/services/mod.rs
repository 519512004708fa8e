//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

mod auth_service;
mod catalog_service;
pub mod container;
mod like_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, AuthSession, Authenticator};
pub use catalog_service::{CatalogManager, CatalogService, ListItem};
pub use like_service::{LikeLedger, LikeReceipt, LikeService};
pub use user_service::{UserManager, UserService};
