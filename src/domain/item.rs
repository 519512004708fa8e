//! Clothing item entity and the metadata fetched for it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::{ASSET_TYPE_PANTS, ITEM_TYPE_PANTS, ITEM_TYPE_SHIRT};

/// A listed clothing item.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Cool Hat")]
    pub name: String,
    #[schema(example = "A very cool hat")]
    pub description: String,
    /// Provider asset id
    #[serde(rename = "robloxId")]
    #[schema(example = "1234567890")]
    pub external_id: String,
    /// Price in Robux
    #[schema(example = 50)]
    pub price: i32,
    #[serde(rename = "type")]
    #[schema(example = "Pants")]
    pub item_type: String,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
    pub seller_id: Option<i32>,
    pub likes_count: i32,
    pub created_at: DateTime<Utc>,
}

/// The part of the seller shown next to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SellerSummary {
    #[schema(example = "drip_dealer")]
    pub username: String,
}

/// Item joined with its seller's username.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ItemWithSeller {
    #[serde(flatten)]
    pub item: ClothingItem,
    pub seller: SellerSummary,
}

/// Item fields resolved from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMetadata {
    pub name: String,
    pub description: String,
    pub price: i32,
    pub item_type: String,
}

impl ItemMetadata {
    /// Fill gaps in a provider response with the catalog defaults.
    pub fn from_provider(
        external_id: &str,
        name: Option<String>,
        description: Option<String>,
        price: Option<i64>,
        asset_type_id: Option<i64>,
    ) -> Self {
        Self {
            name: name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("Item {}", external_id)),
            description: description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| format!("Roblox item {}", external_id)),
            price: price
                .and_then(|p| i32::try_from(p).ok())
                .unwrap_or(0),
            item_type: item_type_for_asset(asset_type_id).to_string(),
        }
    }
}

/// Map a provider asset type code to the stored item type.
pub fn item_type_for_asset(asset_type_id: Option<i64>) -> &'static str {
    match asset_type_id {
        Some(ASSET_TYPE_PANTS) => ITEM_TYPE_PANTS,
        _ => ITEM_TYPE_SHIRT,
    }
}

/// Everything needed to insert an item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub external_id: String,
    pub metadata: ItemMetadata,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
    pub seller_id: i32,
}

/// Result of a like or unlike call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LikeOutcome {
    Added,
    Removed,
    Unchanged,
}

impl LikeOutcome {
    /// Change applied to the item's `likes_count`.
    pub fn delta(&self) -> i32 {
        match self {
            LikeOutcome::Added => 1,
            LikeOutcome::Removed => -1,
            LikeOutcome::Unchanged => 0,
        }
    }
}

/// Asset ids are positive decimal numbers.
pub fn is_valid_external_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 20 && id.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_type_mapping() {
        assert_eq!(item_type_for_asset(Some(12)), "Pants");
        assert_eq!(item_type_for_asset(Some(11)), "Shirt");
        assert_eq!(item_type_for_asset(Some(2)), "Shirt");
        assert_eq!(item_type_for_asset(None), "Shirt");
    }

    #[test]
    fn test_metadata_from_full_response() {
        let metadata = ItemMetadata::from_provider(
            "42",
            Some("Cool Hat".into()),
            Some("Very cool".into()),
            Some(50),
            Some(12),
        );

        assert_eq!(
            metadata,
            ItemMetadata {
                name: "Cool Hat".into(),
                description: "Very cool".into(),
                price: 50,
                item_type: "Pants".into(),
            }
        );
    }

    #[test]
    fn test_metadata_defaults() {
        let metadata = ItemMetadata::from_provider("987", None, Some(String::new()), None, None);

        assert_eq!(metadata.name, "Item 987");
        assert_eq!(metadata.description, "Roblox item 987");
        assert_eq!(metadata.price, 0);
        assert_eq!(metadata.item_type, "Shirt");
    }

    #[test]
    fn test_external_id_validation() {
        assert!(is_valid_external_id("1234567890"));
        assert!(!is_valid_external_id(""));
        assert!(!is_valid_external_id("12a4"));
        assert!(!is_valid_external_id("-5"));
        assert!(!is_valid_external_id("1/../2"));
    }

    #[test]
    fn test_item_serializes_with_wire_names() {
        let item = ItemWithSeller {
            item: ClothingItem {
                id: 1,
                name: "Cool Hat".into(),
                description: "d".into(),
                external_id: "42".into(),
                price: 50,
                item_type: "Pants".into(),
                tags: vec!["anime".into()],
                keywords: vec![],
                seller_id: Some(3),
                likes_count: 2,
                created_at: Utc::now(),
            },
            seller: SellerSummary {
                username: "drip_dealer".into(),
            },
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["robloxId"], "42");
        assert_eq!(json["type"], "Pants");
        assert_eq!(json["likesCount"], 2);
        assert_eq!(json["sellerId"], 3);
        assert_eq!(json["seller"]["username"], "drip_dealer");
    }

    #[test]
    fn test_like_outcome_delta() {
        assert_eq!(LikeOutcome::Added.delta(), 1);
        assert_eq!(LikeOutcome::Removed.delta(), -1);
        assert_eq!(LikeOutcome::Unchanged.delta(), 0);
    }
}
