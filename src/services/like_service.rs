//! Like ledger - one like per identity per item, counter kept in step.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::domain::{Identity, LikeOutcome};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// State of an item's likes after a like or unlike call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeReceipt {
    pub item_id: i32,
    pub outcome: LikeOutcome,
    pub liked: bool,
    pub likes_count: i32,
}

/// Like service trait for dependency injection.
#[async_trait]
pub trait LikeService: Send + Sync {
    /// Record a like. Liking twice is a no-op.
    async fn like(&self, item_id: i32, identity: Identity) -> AppResult<LikeReceipt>;

    /// Withdraw a like. Unliking an item never liked is a no-op.
    async fn unlike(&self, item_id: i32, identity: Identity) -> AppResult<LikeReceipt>;

    /// Items the identity currently likes, most recent first
    async fn liked_items(&self, identity: Identity) -> AppResult<Vec<i32>>;
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Toggle {
    Like,
    Unlike,
}

/// Transactional implementation of LikeService.
pub struct LikeLedger<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> LikeLedger<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn apply(&self, item_id: i32, identity: Identity, toggle: Toggle) -> AppResult<LikeReceipt> {
        let receipt = with_transaction!(self.uow, |ctx| {
            // Row lock serializes concurrent toggles on this item
            let item = ctx
                .items()
                .lock(item_id)
                .await?
                .ok_or(AppError::NotFound)?;

            let existing = ctx.likes().find(item_id, &identity).await?;

            let outcome = match (toggle, existing) {
                (Toggle::Like, None) => {
                    ctx.likes().insert(item_id, &identity).await?;
                    LikeOutcome::Added
                }
                (Toggle::Unlike, Some(like)) => {
                    ctx.likes().delete(like.id).await?;
                    LikeOutcome::Removed
                }
                _ => LikeOutcome::Unchanged,
            };

            if outcome != LikeOutcome::Unchanged {
                ctx.items()
                    .adjust_likes_count(item_id, outcome.delta())
                    .await?;
            }

            let liked = match outcome {
                LikeOutcome::Added => true,
                LikeOutcome::Removed => false,
                LikeOutcome::Unchanged => toggle == Toggle::Like,
            };

            Ok(LikeReceipt {
                item_id,
                outcome,
                liked,
                likes_count: item.likes_count + outcome.delta(),
            })
        })?;

        tracing::debug!(
            item_id,
            outcome = ?receipt.outcome,
            likes_count = receipt.likes_count,
            "Like ledger updated"
        );
        Ok(receipt)
    }
}

#[async_trait]
impl<U: UnitOfWork> LikeService for LikeLedger<U> {
    async fn like(&self, item_id: i32, identity: Identity) -> AppResult<LikeReceipt> {
        self.apply(item_id, identity, Toggle::Like).await
    }

    async fn unlike(&self, item_id: i32, identity: Identity) -> AppResult<LikeReceipt> {
        self.apply(item_id, identity, Toggle::Unlike).await
    }

    async fn liked_items(&self, identity: Identity) -> AppResult<Vec<i32>> {
        self.uow.likes().liked_item_ids(identity).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::MockLikeRepository;
    use crate::services::test_support::TestUnitOfWork;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_liked_items_reads_through() {
        let mut likes = MockLikeRepository::new();
        likes
            .expect_liked_item_ids()
            .with(eq(Identity::Anonymous("10.0.0.1".into())))
            .returning(|_| Ok(vec![3, 1]));

        let ledger = LikeLedger::new(Arc::new(TestUnitOfWork::new().with_likes(likes)));
        let ids = ledger
            .liked_items(Identity::Anonymous("10.0.0.1".into()))
            .await
            .unwrap();

        assert_eq!(ids, vec![3, 1]);
    }

    #[tokio::test]
    async fn test_like_surfaces_transaction_failure() {
        let ledger = LikeLedger::new(Arc::new(TestUnitOfWork::new()));
        let result = ledger.like(1, Identity::User(1)).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
