//! Domain layer - Core business entities and logic
//!
//! Users, clothing items, likes and listing criteria, independent of
//! how they are stored or served.

pub mod catalog_query;
pub mod identity;
pub mod item;
pub mod password;
pub mod user;

pub use catalog_query::{CatalogQuery, Sort, SortKey, SortOrder};
pub use identity::{Identity, IdentityStrategy};
pub use item::{ClothingItem, ItemMetadata, ItemWithSeller, LikeOutcome, NewItem, SellerSummary};
pub use password::Password;
pub use user::{ProfileUpdate, PublicUser, SellerStats, SessionUser, User, UserProfile, UserRole};
