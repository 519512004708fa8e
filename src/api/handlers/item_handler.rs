//! Catalog handlers: listing, lookup, creation and thumbnails.

use axum::{
    extract::{Path, Query, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Deserializer};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::config::IMAGE_CACHE_CONTROL;
use crate::domain::{CatalogQuery, ClothingItem, ItemWithSeller};
use crate::errors::{AppError, AppResult};
use crate::services::ListItem;
use crate::types::Created;

/// Asset ids arrive as JSON strings or numbers.
fn asset_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text.trim().to_string(),
        Raw::Number(number) => number.to_string(),
    })
}

/// Listing request for a provider asset
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    /// Roblox asset id, string or number
    #[serde(deserialize_with = "asset_id")]
    #[schema(value_type = String, example = "1234567")]
    pub id: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 tags"))]
    pub tags: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 keywords"))]
    pub keywords: Vec<String>,
}

/// Catalog listing filters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListItemsParams {
    /// Substring matched against name, description, tags and keywords
    pub search: Option<String>,
    /// Exact item type; `all` disables the filter
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    /// JSON array string or comma separated list; matches any
    pub tags: Option<String>,
    pub seller_id: Option<String>,
    /// `price`, `likesCount`, `createdAt` or `popularity`
    pub sort_by: Option<String>,
    /// `asc` or `desc`
    pub sort_order: Option<String>,
}

impl TryFrom<ListItemsParams> for CatalogQuery {
    type Error = AppError;

    fn try_from(params: ListItemsParams) -> AppResult<Self> {
        let seller_id = params
            .seller_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<i32>()
                    .map_err(|_| AppError::validation("sellerId must be an integer"))
            })
            .transpose()?;

        CatalogQuery::from_params(
            params.search,
            params.item_type,
            params.tags,
            seller_id,
            params.sort_by,
            params.sort_order,
        )
    }
}

/// Create catalog routes
pub fn item_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/items", get(list_items))
        .route("/api/items/:id", get(get_item))
        .route("/api/roblox-image/:asset_id", get(item_image));

    let seller = Router::new()
        .route("/api/items", post(create_item))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(seller)
}

/// List a provider asset under the logged-in seller
#[utoipa::path(
    post,
    path = "/api/items",
    tag = "Items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item listed", body = ClothingItem),
        (status = 400, description = "Invalid id or provider fetch failed"),
        (status = 401, description = "Not logged in")
    ),
    security(("session_cookie" = []))
)]
pub async fn create_item(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateItemRequest>,
) -> AppResult<Created<ClothingItem>> {
    let item = state
        .catalog_service
        .create_item(
            current_user.id,
            ListItem {
                external_id: payload.id,
                tags: payload.tags,
                keywords: payload.keywords,
            },
        )
        .await?;

    Ok(Created(item))
}

/// Search, filter and sort the catalog
#[utoipa::path(
    get,
    path = "/api/items",
    tag = "Items",
    params(ListItemsParams),
    responses(
        (status = 200, description = "Matching items with their seller", body = [ItemWithSeller]),
        (status = 400, description = "Unknown sort key or malformed filter")
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ListItemsParams>,
) -> AppResult<Json<Vec<ItemWithSeller>>> {
    let query = CatalogQuery::try_from(params)?;
    let items = state.catalog_service.list_items(query).await?;
    Ok(Json(items))
}

/// Get a single item
#[utoipa::path(
    get,
    path = "/api/items/{id}",
    tag = "Items",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item with seller", body = ItemWithSeller),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ItemWithSeller>> {
    let item = state.catalog_service.get_item(id).await?;
    Ok(Json(item))
}

/// Proxy an asset thumbnail
#[utoipa::path(
    get,
    path = "/api/roblox-image/{asset_id}",
    tag = "Items",
    params(("asset_id" = String, Path, description = "Roblox asset id")),
    responses(
        (status = 200, description = "PNG thumbnail", content_type = "image/png"),
        (status = 404, description = "No thumbnail available")
    )
)]
pub async fn item_image(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> AppResult<Response> {
    let bytes = state
        .catalog_service
        .item_image(&asset_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((
        [(CONTENT_TYPE, "image/png"), (CACHE_CONTROL, IMAGE_CACHE_CONTROL)],
        bytes,
    )
        .into_response())
}
