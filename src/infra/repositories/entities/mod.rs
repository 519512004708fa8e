//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod clothing_item;
pub mod item_like;
pub mod user;

#[allow(unused_imports)]
pub use clothing_item::{Entity as ClothingItemEntity, Model as ClothingItemModel};
#[allow(unused_imports)]
pub use item_like::{Entity as ItemLikeEntity, Model as ItemLikeModel};
#[allow(unused_imports)]
pub use user::{Entity as UserEntity, Model as UserModel};
