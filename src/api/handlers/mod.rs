//! HTTP request handlers.

pub mod auth_handler;
pub mod item_handler;
pub mod like_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use item_handler::item_routes;
pub use like_handler::like_routes;
pub use user_handler::user_routes;
