//! User profile and seller directory handlers.

use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::{get, patch},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::{ProfileUpdate, PublicUser, UserProfile};
use crate::errors::{AppError, AppResult};

/// Profile update request; omitted fields stay unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(url(message = "Avatar URL must be a valid URL"))]
    #[schema(example = "https://tr.rbxcdn.com/avatar.png")]
    pub avatar_url: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    #[schema(example = "Hand-drawn streetwear for your avatar", max_length = 500)]
    pub description: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            avatar_url: request.avatar_url,
            description: request.description,
        }
    }
}

/// Create user routes
pub fn user_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/users/:id", get(get_user))
        .route("/api/sellers", get(list_sellers));

    let own_profile = Router::new()
        .route("/api/profile", patch(update_profile))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(own_profile)
}

/// Public profile with seller stats
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<UserProfile>> {
    let profile = state.user_service.get_profile(id).await?;
    Ok(Json(profile))
}

/// Update the caller's own profile
#[utoipa::path(
    patch,
    path = "/api/profile",
    tag = "Users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = PublicUser),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not logged in")
    ),
    security(("session_cookie" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<PublicUser>> {
    let update = ProfileUpdate::from(payload);
    if update.is_empty() {
        return Err(AppError::validation("Nothing to update"));
    }

    let user = state
        .user_service
        .update_profile(current_user.id, update)
        .await?;

    Ok(Json(PublicUser::from(user)))
}

/// All sellers with stats
#[utoipa::path(
    get,
    path = "/api/sellers",
    tag = "Users",
    responses(
        (status = 200, description = "Sellers", body = [UserProfile])
    )
)]
pub async fn list_sellers(State(state): State<AppState>) -> AppResult<Json<Vec<UserProfile>>> {
    let sellers = state.user_service.list_sellers().await?;
    Ok(Json(sellers))
}
