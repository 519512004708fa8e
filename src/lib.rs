//! Clothing catalog backend.
//!
//! Sellers list Roblox clothing assets, visitors browse and like them, and
//! profiles report seller totals. Item metadata and thumbnails come from the
//! Roblox public APIs through a retrying gateway.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, items, likes and listing criteria
//! - **services**: Auth, catalog, like ledger and profile use cases
//! - **infra**: Database, Redis, session storage and the provider gateway
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve --port 5000
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{ClothingItem, Identity, Password, User, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
