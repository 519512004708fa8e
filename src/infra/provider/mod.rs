//! Outbound fetch gateway for the item provider.

mod error;
mod retry;
mod roblox;

use async_trait::async_trait;
use axum::body::Bytes;

use crate::domain::ItemMetadata;

pub use error::ProviderError;
pub use retry::RetryPolicy;
pub use roblox::RobloxGateway;

#[cfg(test)]
use mockall::automock;

/// Item provider trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Resolve an asset id to catalog metadata, retrying transient failures
    async fn fetch_item_metadata(&self, external_id: &str) -> Result<ItemMetadata, ProviderError>;

    /// Thumbnail bytes for an asset, `None` when unavailable
    async fn fetch_item_image(&self, external_id: &str) -> Option<Bytes>;
}
