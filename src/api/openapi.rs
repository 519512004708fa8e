//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, item_handler, like_handler, user_handler};
use crate::config::SESSION_COOKIE_NAME;
use crate::domain::{
    ClothingItem, ItemWithSeller, LikeOutcome, PublicUser, SellerSummary, SessionUser,
    UserProfile, UserRole,
};
use crate::services::LikeReceipt;
use crate::types::MessageResponse;

/// OpenAPI documentation for the clothing catalog
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clothing Catalog API",
        version = "0.1.0",
        description = "Roblox clothing catalog with seller accounts, likes and a thumbnail proxy"
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::logout,
        auth_handler::me,
        // Catalog endpoints
        item_handler::create_item,
        item_handler::list_items,
        item_handler::get_item,
        item_handler::item_image,
        // Likes
        like_handler::like_item,
        like_handler::unlike_item,
        like_handler::my_likes,
        // Users and sellers
        user_handler::get_user,
        user_handler::update_profile,
        user_handler::list_sellers,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            PublicUser,
            SessionUser,
            UserProfile,
            ClothingItem,
            SellerSummary,
            ItemWithSeller,
            LikeOutcome,
            LikeReceipt,
            MessageResponse,
            // Request bodies
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            item_handler::CreateItemRequest,
            user_handler::UpdateProfileRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Seller registration and sessions"),
        (name = "Items", description = "Catalog listing, search and thumbnails"),
        (name = "Likes", description = "Likes by users and anonymous visitors"),
        (name = "Users", description = "Profiles and the seller directory")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for the session cookie
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    SESSION_COOKIE_NAME,
                    "Session cookie set by /api/login and /api/register",
                ))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_catalog_paths() {
        let doc = ApiDoc::openapi();

        for path in ["/api/items", "/api/items/{id}/like", "/api/sellers", "/api/me"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
