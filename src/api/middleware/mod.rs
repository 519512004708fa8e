//! API middleware.

mod auth;
mod rate_limit;

pub use auth::{auth_middleware, resolve_user, session_token, CurrentUser};
pub use rate_limit::{client_ip, rate_limit_auth_middleware, RateLimitError};
