//! Like handlers. Open to anonymous callers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};

use crate::api::extractors::RequestIdentity;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::LikeReceipt;

/// Create like routes
pub fn like_routes() -> Router<AppState> {
    Router::new()
        .route("/api/items/:id/like", post(like_item).delete(unlike_item))
        .route("/api/users/me/likes", get(my_likes))
}

/// Like an item
#[utoipa::path(
    post,
    path = "/api/items/{id}/like",
    tag = "Likes",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Liked, or already liked", body = LikeReceipt),
        (status = 404, description = "Item not found")
    )
)]
pub async fn like_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    RequestIdentity(identity): RequestIdentity,
) -> AppResult<Json<LikeReceipt>> {
    let receipt = state.like_service.like(id, identity).await?;
    Ok(Json(receipt))
}

/// Remove a like
#[utoipa::path(
    delete,
    path = "/api/items/{id}/like",
    tag = "Likes",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Unliked, or was not liked", body = LikeReceipt),
        (status = 404, description = "Item not found")
    )
)]
pub async fn unlike_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    RequestIdentity(identity): RequestIdentity,
) -> AppResult<Json<LikeReceipt>> {
    let receipt = state.like_service.unlike(id, identity).await?;
    Ok(Json(receipt))
}

/// Item ids the caller likes
#[utoipa::path(
    get,
    path = "/api/users/me/likes",
    tag = "Likes",
    responses(
        (status = 200, description = "Liked item ids", body = [i32])
    )
)]
pub async fn my_likes(
    State(state): State<AppState>,
    RequestIdentity(identity): RequestIdentity,
) -> AppResult<Json<Vec<i32>>> {
    let ids = state.like_service.liked_items(identity).await?;
    Ok(Json(ids))
}
