//! Read side of the like ledger. Writes go through the unit of work.

use async_trait::async_trait;
use std::sync::Arc;
use sea_orm::{
    sea_query::SimpleExpr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use super::entities::item_like::{self, Entity as ItemLikeEntity};
use crate::domain::Identity;
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Like repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Ids of the items this identity currently likes
    async fn liked_item_ids(&self, identity: Identity) -> AppResult<Vec<i32>>;
}

/// Concrete implementation of LikeRepository
pub struct LikeStore {
    db: Arc<DatabaseConnection>,
}

impl LikeStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// Condition selecting the like rows owned by an identity.
pub(crate) fn owned_by(identity: &Identity) -> SimpleExpr {
    match identity {
        Identity::User(id) => item_like::Column::UserId.eq(*id),
        Identity::Anonymous(key) => item_like::Column::IpAddress.eq(key.as_str()),
    }
}

#[async_trait]
impl LikeRepository for LikeStore {
    async fn liked_item_ids(&self, identity: Identity) -> AppResult<Vec<i32>> {
        ItemLikeEntity::find()
            .select_only()
            .column(item_like::Column::ItemId)
            .filter(owned_by(&identity))
            .order_by_desc(item_like::Column::CreatedAt)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)
    }
}
