//! Catalog service - listing items and adding new ones from the provider.

use async_trait::async_trait;
use axum::body::Bytes;
use std::sync::Arc;

use crate::domain::{
    item::is_valid_external_id, CatalogQuery, ClothingItem, ItemWithSeller, NewItem,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{CatalogProvider, UnitOfWork};

/// What a seller submits to list an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub external_id: String,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
}

/// Catalog service trait for dependency injection.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch provider metadata and list the item under the seller
    async fn create_item(&self, seller_id: i32, request: ListItem) -> AppResult<ClothingItem>;

    /// Items matching the query
    async fn list_items(&self, query: CatalogQuery) -> AppResult<Vec<ItemWithSeller>>;

    /// Single item with seller
    async fn get_item(&self, id: i32) -> AppResult<ItemWithSeller>;

    /// Thumbnail bytes, `None` when the provider has none for the asset
    async fn item_image(&self, external_id: &str) -> AppResult<Option<Bytes>>;
}

/// Concrete implementation of CatalogService.
pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
    provider: Arc<dyn CatalogProvider>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>, provider: Arc<dyn CatalogProvider>) -> Self {
        Self { uow, provider }
    }
}

fn clean_labels(labels: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim();
        if !label.is_empty() && !cleaned.iter().any(|l| l == label) {
            cleaned.push(label.to_string());
        }
    }
    cleaned
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn create_item(&self, seller_id: i32, request: ListItem) -> AppResult<ClothingItem> {
        if !is_valid_external_id(&request.external_id) {
            return Err(AppError::validation("Item id must be a numeric Roblox asset id"));
        }

        let metadata = self
            .provider
            .fetch_item_metadata(&request.external_id)
            .await?;

        let item = self
            .uow
            .items()
            .create(NewItem {
                external_id: request.external_id,
                metadata,
                tags: clean_labels(request.tags),
                keywords: clean_labels(request.keywords),
                seller_id,
            })
            .await?;

        tracing::info!(item_id = item.id, seller_id, external_id = %item.external_id, "Item listed");
        Ok(item)
    }

    async fn list_items(&self, query: CatalogQuery) -> AppResult<Vec<ItemWithSeller>> {
        self.uow.items().list(query).await
    }

    async fn get_item(&self, id: i32) -> AppResult<ItemWithSeller> {
        self.uow.items().find(id).await?.ok_or_not_found()
    }

    async fn item_image(&self, external_id: &str) -> AppResult<Option<Bytes>> {
        if !is_valid_external_id(external_id) {
            return Ok(None);
        }
        Ok(self.provider.fetch_item_image(external_id).await)
    }
}
