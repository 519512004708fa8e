//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ROLE_ADMIN, ROLE_SELLER};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Seller,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::Seller => ROLE_SELLER,
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::Seller,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields a user may change on their own profile. `None` leaves the value as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub avatar_url: Option<String>,
    pub description: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.avatar_url.is_none() && self.description.is_none()
    }
}

/// Minimal identity returned by register, login and `/api/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SessionUser {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "drip_dealer")]
    pub username: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "drip_dealer")]
    pub username: String,
    #[schema(example = "seller")]
    pub role: String,
    #[schema(example = "https://tr.rbxcdn.com/avatar.png")]
    pub avatar_url: Option<String>,
    #[schema(example = "Hand-drawn streetwear for your avatar")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role.to_string(),
            avatar_url: user.avatar_url,
            description: user.description,
            created_at: user.created_at,
        }
    }
}

/// Aggregates computed per request over a seller's items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SellerStats {
    pub total_likes: i64,
    pub items_count: i64,
}

/// Public profile with seller aggregates
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: PublicUser,
    #[schema(example = 42)]
    pub total_likes: i64,
    #[schema(example = 7)]
    pub items_count: i64,
}

impl UserProfile {
    pub fn new(user: User, stats: SellerStats) -> Self {
        Self {
            user: PublicUser::from(user),
            total_likes: stats.total_likes,
            items_count: stats.items_count,
        }
    }
}
