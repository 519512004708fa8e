//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and owns the transaction lifecycle
//! (begin, commit, rollback) for operations that must be atomic, such as
//! the like ledger keeping `likes_count` equal to its rows.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, AccessMode, ActiveValue::NotSet, ColumnTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, IsolationLevel, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use std::sync::Arc;

use super::repositories::entities::{clothing_item, item_like};
use super::repositories::{
    owned_by, ItemRepository, ItemStore, LikeRepository, LikeStore, UserRepository, UserStore,
};
use crate::domain::{ClothingItem, Identity};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Not object safe because of the generic `transaction` method, so services
/// take it as a type parameter.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get catalog store
    fn items(&self) -> Arc<dyn ItemRepository>;

    /// Get like ledger read side
    fn likes(&self) -> Arc<dyn LikeRepository>;

    /// Execute a closure within a READ COMMITTED transaction.
    ///
    /// Committed on `Ok`, rolled back on `Err`.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Item rows inside this transaction
    pub fn items(&self) -> TxItemRepository<'_> {
        TxItemRepository { txn: self.txn }
    }

    /// Like rows inside this transaction
    pub fn likes(&self) -> TxLikeRepository<'_> {
        TxLikeRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: Arc<DatabaseConnection>,
    user_repo: Arc<UserStore>,
    item_repo: Arc<ItemStore>,
    like_repo: Arc<LikeStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            item_repo: Arc::new(ItemStore::new(db.clone())),
            like_repo: Arc::new(LikeStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn items(&self) -> Arc<dyn ItemRepository> {
        self.item_repo.clone()
    }

    fn likes(&self) -> Arc<dyn LikeRepository> {
        self.like_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware item repository.
pub struct TxItemRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxItemRepository<'a> {
    /// Load the item and hold `FOR UPDATE` on its row until the transaction ends.
    pub async fn lock(&self, id: i32) -> AppResult<Option<ClothingItem>> {
        let model = clothing_item::Entity::find_by_id(id)
            .lock_exclusive()
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(model.map(ClothingItem::from))
    }

    /// Add `delta` to the item's `likes_count` in place.
    pub async fn adjust_likes_count(&self, id: i32, delta: i32) -> AppResult<()> {
        let result = clothing_item::Entity::update_many()
            .col_expr(
                clothing_item::Column::LikesCount,
                Expr::col(clothing_item::Column::LikesCount).add(delta),
            )
            .filter(clothing_item::Column::Id.eq(id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Transaction-aware like repository.
pub struct TxLikeRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxLikeRepository<'a> {
    /// The like row for (item, identity), if any.
    pub async fn find(&self, item_id: i32, identity: &Identity) -> AppResult<Option<item_like::Model>> {
        item_like::Entity::find()
            .filter(item_like::Column::ItemId.eq(item_id))
            .filter(owned_by(identity))
            .one(self.txn)
            .await
            .map_err(AppError::from)
    }

    /// Record a like owned by exactly one of user id or anonymous key.
    pub async fn insert(&self, item_id: i32, identity: &Identity) -> AppResult<()> {
        let active_model = item_like::ActiveModel {
            id: NotSet,
            item_id: Set(item_id),
            user_id: Set(identity.user_id()),
            ip_address: Set(identity.anonymous_key().map(str::to_string)),
            created_at: Set(chrono::Utc::now()),
        };

        item_like::Entity::insert(active_model)
            .exec_without_returning(self.txn)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }

    /// Remove a like row by id.
    pub async fn delete(&self, like_id: i32) -> AppResult<()> {
        item_like::Entity::delete_by_id(like_id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}

/// Simpler API for executing transactional operations.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
