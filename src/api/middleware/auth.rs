//! Session cookie authentication middleware.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::api::AppState;
use crate::config::SESSION_COOKIE_NAME;
use crate::domain::{User, UserRole};
use crate::errors::{AppError, AppResult};

/// Authenticated user resolved from the session cookie
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub role: UserRole,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Session token carried by the request, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Resolve the caller's session to a user. Missing, expired or orphaned
/// sessions all yield `None`.
pub async fn resolve_user(state: &AppState, headers: &HeaderMap) -> AppResult<Option<CurrentUser>> {
    let Some(token) = session_token(headers) else {
        return Ok(None);
    };

    Ok(state
        .auth_service
        .resolve_session(&token)
        .await?
        .map(CurrentUser::from))
}

/// Session authentication middleware.
///
/// Rejects the request with 401 unless the `sid` cookie names a live
/// session, then injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let current_user = resolve_user(&state, request.headers())
        .await?
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}
