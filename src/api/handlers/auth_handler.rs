//! Authentication handlers.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, rate_limit_auth_middleware, session_token, CurrentUser};
use crate::api::{AppState, HttpSettings};
use crate::config::SESSION_COOKIE_NAME;
use crate::domain::{PublicUser, SessionUser};
use crate::errors::AppResult;
use crate::services::AuthSession;
use crate::types::MessageResponse;

/// Seller registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3 to 50 characters"))]
    #[schema(example = "drip_dealer", min_length = 3)]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "secret1", min_length = 6)]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "drip_dealer")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "secret1")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let credentials = Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_auth_middleware,
        ));

    let session = Router::new()
        .route("/api/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    credentials
        .route("/api/logout", post(logout))
        .merge(session)
}

fn session_cookie(token: String, settings: &HttpSettings) -> Cookie<'static> {
    let max_age = i64::try_from(settings.session_ttl_seconds).unwrap_or(i64::MAX);
    Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.cookie_secure)
        .max_age(Duration::seconds(max_age))
        .build()
}

fn start_session(state: &AppState, jar: CookieJar, session: AuthSession) -> (CookieJar, Json<SessionUser>) {
    let jar = jar.add(session_cookie(session.token, &state.settings));
    (jar, Json(session.user))
}

/// Register a seller account and log it in
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered; session cookie set", body = SessionUser),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username already taken"),
        (status = 429, description = "Too many attempts")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, CookieJar, Json<SessionUser>)> {
    let session = state
        .auth_service
        .register(payload.username, payload.password)
        .await?;

    let (jar, body) = start_session(&state, jar, session);
    Ok((StatusCode::CREATED, jar, body))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = SessionUser),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many attempts")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<SessionUser>)> {
    let session = state
        .auth_service
        .login(payload.username, payload.password)
        .await?;

    Ok(start_session(&state, jar, session))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Session ended", body = MessageResponse)
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    if let Some(token) = session_token(&headers) {
        state.auth_service.logout(&token).await?;
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"));
    Ok((jar, Json(MessageResponse::new("Logged out"))))
}

/// Get the logged-in user
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current user", body = PublicUser),
        (status = 401, description = "Not logged in")
    ),
    security(("session_cookie" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<PublicUser>> {
    let user = state.user_service.get_user(current_user.id).await?;
    Ok(Json(PublicUser::from(user)))
}
