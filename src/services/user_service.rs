//! User service - profiles and seller directory.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::MAX_DESCRIPTION_LENGTH;
use crate::domain::{ProfileUpdate, SellerStats, User, UserProfile};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// Public profile with live seller aggregates
    async fn get_profile(&self, id: i32) -> AppResult<UserProfile>;

    /// Change the caller's own avatar and/or description
    async fn update_profile(&self, id: i32, update: ProfileUpdate) -> AppResult<User>;

    /// Every seller with aggregates
    async fn list_sellers(&self) -> AppResult<Vec<UserProfile>>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn validate_update(update: &ProfileUpdate) -> AppResult<()> {
    if let Some(description) = &update.description {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Description must be at most {} characters",
                MAX_DESCRIPTION_LENGTH
            )));
        }
    }
    if let Some(avatar_url) = &update.avatar_url {
        if !(avatar_url.starts_with("http://") || avatar_url.starts_with("https://")) {
            return Err(AppError::validation("Avatar URL must be an http(s) URL"));
        }
    }
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_profile(&self, id: i32) -> AppResult<UserProfile> {
        let users = self.uow.users();
        let items = self.uow.items();

        let (user, total_likes, items_count) = tokio::try_join!(
            users.find_by_id(id),
            items.total_likes(id),
            items.items_count(id),
        )?;

        let user = user.ok_or_not_found()?;
        Ok(UserProfile::new(
            user,
            SellerStats {
                total_likes,
                items_count,
            },
        ))
    }

    async fn update_profile(&self, id: i32, update: ProfileUpdate) -> AppResult<User> {
        validate_update(&update)?;
        self.uow.users().update_profile(id, update).await
    }

    async fn list_sellers(&self) -> AppResult<Vec<UserProfile>> {
        let users = self.uow.users();
        let items = self.uow.items();

        let (sellers, stats) = tokio::try_join!(users.list_sellers(), items.stats_by_seller())?;

        Ok(sellers
            .into_iter()
            .map(|seller| {
                let seller_stats = stats.get(&seller.id).copied().unwrap_or_default();
                UserProfile::new(seller, seller_stats)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::repositories::{MockItemRepository, MockUserRepository};
    use crate::services::test_support::TestUnitOfWork;
    use chrono::Utc;
    use mockall::predicate::eq;
    use std::collections::HashMap;

    fn create_test_user(id: i32) -> User {
        User {
            id,
            username: format!("seller{}", id),
            password_hash: "hashed".to_string(),
            role: UserRole::Seller,
            avatar_url: None,
            description: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_get_profile_includes_aggregates() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(4))
            .returning(|id| Ok(Some(create_test_user(id))));
        let mut items = MockItemRepository::new();
        items.expect_total_likes().with(eq(4)).returning(|_| Ok(17));
        items.expect_items_count().with(eq(4)).returning(|_| Ok(3));

        let uow = TestUnitOfWork::new().with_users(users).with_items(items);
        let profile = UserManager::new(Arc::new(uow)).get_profile(4).await.unwrap();

        assert_eq!(profile.user.id, 4);
        assert_eq!(profile.total_likes, 17);
        assert_eq!(profile.items_count, 3);
    }

    #[tokio::test]
    async fn test_get_profile_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let mut items = MockItemRepository::new();
        items.expect_total_likes().returning(|_| Ok(0));
        items.expect_items_count().returning(|_| Ok(0));

        let uow = TestUnitOfWork::new().with_users(users).with_items(items);
        let result = UserManager::new(Arc::new(uow)).get_profile(404).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_sellers_defaults_missing_stats_to_zero() {
        let mut users = MockUserRepository::new();
        users
            .expect_list_sellers()
            .returning(|| Ok(vec![create_test_user(1), create_test_user(2)]));
        let mut items = MockItemRepository::new();
        items.expect_stats_by_seller().returning(|| {
            Ok(HashMap::from([(
                2,
                SellerStats {
                    total_likes: 9,
                    items_count: 4,
                },
            )]))
        });

        let uow = TestUnitOfWork::new().with_users(users).with_items(items);
        let sellers = UserManager::new(Arc::new(uow)).list_sellers().await.unwrap();

        assert_eq!(sellers.len(), 2);
        assert_eq!((sellers[0].total_likes, sellers[0].items_count), (0, 0));
        assert_eq!((sellers[1].total_likes, sellers[1].items_count), (9, 4));
    }

    #[tokio::test]
    async fn test_update_profile_rejects_long_description() {
        let mut users = MockUserRepository::new();
        users.expect_update_profile().never();

        let uow = TestUnitOfWork::new().with_users(users);
        let update = ProfileUpdate {
            description: Some("x".repeat(501)),
            ..Default::default()
        };
        let result = UserManager::new(Arc::new(uow)).update_profile(1, update).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_profile_rejects_non_url_avatar() {
        let uow = TestUnitOfWork::new();
        let update = ProfileUpdate {
            avatar_url: Some("javascript:alert(1)".into()),
            ..Default::default()
        };
        let result = UserManager::new(Arc::new(uow)).update_profile(1, update).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_profile_passes_through() {
        let mut users = MockUserRepository::new();
        users
            .expect_update_profile()
            .withf(|id, update| *id == 1 && update.description.as_deref() == Some("new bio"))
            .returning(|id, update| {
                let mut user = create_test_user(id);
                user.description = update.description;
                Ok(user)
            });

        let uow = TestUnitOfWork::new().with_users(users);
        let update = ProfileUpdate {
            description: Some("new bio".into()),
            ..Default::default()
        };
        let user = UserManager::new(Arc::new(uow)).update_profile(1, update).await.unwrap();

        assert_eq!(user.description.as_deref(), Some("new bio"));
    }
}
