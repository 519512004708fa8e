//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub mod entities;
mod item_repository;
mod like_repository;
mod user_repository;

pub use item_repository::{ItemRepository, ItemStore};
pub use like_repository::{LikeRepository, LikeStore};
pub use user_repository::{UserRepository, UserStore};

pub(crate) use like_repository::owned_by;

#[cfg(test)]
pub use item_repository::MockItemRepository;
#[cfg(test)]
pub use like_repository::MockLikeRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
