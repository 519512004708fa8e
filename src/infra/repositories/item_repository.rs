//! Catalog store: item persistence, listings and seller aggregates.

use std::collections::HashMap;

use async_trait::async_trait;
use std::sync::Arc;
use sea_orm::{
    sea_query::{Expr, Order},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, SelectTwo, Set,
};

use super::entities::{
    clothing_item::{self, ActiveModel, Entity as ItemEntity},
    user::{self, Entity as UserEntity},
};
use crate::config::UNKNOWN_SELLER_NAME;
use crate::domain::{
    catalog_query::like_pattern, CatalogQuery, ClothingItem, ItemWithSeller, NewItem,
    SellerStats, SellerSummary, SortKey, SortOrder,
};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Catalog store trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// List items matching every criterion in the query, in its sort order
    async fn list(&self, query: CatalogQuery) -> AppResult<Vec<ItemWithSeller>>;

    /// Find a single item with its seller
    async fn find(&self, id: i32) -> AppResult<Option<ItemWithSeller>>;

    /// Insert a new item with zero likes
    async fn create(&self, item: NewItem) -> AppResult<ClothingItem>;

    /// Sum of likes across the seller's items (0 when they have none)
    async fn total_likes(&self, seller_id: i32) -> AppResult<i64>;

    /// Number of items the seller has listed
    async fn items_count(&self, seller_id: i32) -> AppResult<i64>;

    /// Aggregates for every seller with at least one item, in one query
    async fn stats_by_seller(&self) -> AppResult<HashMap<i32, SellerStats>>;
}

/// Concrete implementation of ItemRepository
pub struct ItemStore {
    db: Arc<DatabaseConnection>,
}

impl ItemStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// Build the listing select: items LEFT JOIN users, filtered and ordered.
pub(crate) fn listing_query(query: &CatalogQuery) -> SelectTwo<ItemEntity, UserEntity> {
    let mut select = ItemEntity::find().find_also_related(UserEntity);

    if let Some(search) = &query.search {
        select = select.filter(Expr::cust_with_values(
            r#"("clothing_items"."name" ILIKE $1 OR "clothing_items"."description" ILIKE $1 OR EXISTS (SELECT 1 FROM unnest("clothing_items"."tags") AS tag WHERE tag ILIKE $1) OR EXISTS (SELECT 1 FROM unnest("clothing_items"."keywords") AS kw WHERE kw ILIKE $1))"#,
            [like_pattern(search)],
        ));
    }

    if let Some(item_type) = &query.item_type {
        select = select.filter(clothing_item::Column::ItemType.eq(item_type.as_str()));
    }

    if !query.tags.is_empty() {
        select = select.filter(Expr::cust_with_values(
            r#""clothing_items"."tags" && $1"#,
            [query.tags.clone()],
        ));
    }

    if let Some(seller_id) = query.seller_id {
        select = select.filter(clothing_item::Column::SellerId.eq(seller_id));
    }

    let column = match query.sort.key {
        SortKey::Price => clothing_item::Column::Price,
        SortKey::LikesCount | SortKey::Popularity => clothing_item::Column::LikesCount,
        SortKey::CreatedAt => clothing_item::Column::CreatedAt,
    };
    let order = match query.sort.effective_order() {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    };

    select
        .order_by(column, order)
        .order_by_desc(clothing_item::Column::Id)
}

fn with_seller(item: clothing_item::Model, seller: Option<user::Model>) -> ItemWithSeller {
    ItemWithSeller {
        item: ClothingItem::from(item),
        seller: SellerSummary {
            username: seller
                .map(|u| u.username)
                .unwrap_or_else(|| UNKNOWN_SELLER_NAME.to_string()),
        },
    }
}

#[async_trait]
impl ItemRepository for ItemStore {
    async fn list(&self, query: CatalogQuery) -> AppResult<Vec<ItemWithSeller>> {
        let rows = listing_query(&query)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|(item, seller)| with_seller(item, seller))
            .collect())
    }

    async fn find(&self, id: i32) -> AppResult<Option<ItemWithSeller>> {
        let row = ItemEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(row.map(|(item, seller)| with_seller(item, seller)))
    }

    async fn create(&self, item: NewItem) -> AppResult<ClothingItem> {
        let active_model = ActiveModel {
            name: Set(item.metadata.name),
            description: Set(item.metadata.description),
            external_id: Set(item.external_id),
            price: Set(item.metadata.price),
            item_type: Set(item.metadata.item_type),
            tags: Set(item.tags),
            keywords: Set(item.keywords),
            seller_id: Set(Some(item.seller_id)),
            likes_count: Set(0),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(ClothingItem::from(model))
    }

    async fn total_likes(&self, seller_id: i32) -> AppResult<i64> {
        let total: Option<i64> = ItemEntity::find()
            .select_only()
            .column_as(
                Expr::cust(r#"COALESCE(SUM("clothing_items"."likes_count"), 0)::bigint"#),
                "total_likes",
            )
            .filter(clothing_item::Column::SellerId.eq(seller_id))
            .into_tuple()
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(total.unwrap_or(0))
    }

    async fn items_count(&self, seller_id: i32) -> AppResult<i64> {
        let count: Option<i64> = ItemEntity::find()
            .select_only()
            .column_as(clothing_item::Column::Id.count(), "items_count")
            .filter(clothing_item::Column::SellerId.eq(seller_id))
            .into_tuple()
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(count.unwrap_or(0))
    }

    async fn stats_by_seller(&self) -> AppResult<HashMap<i32, SellerStats>> {
        let rows: Vec<(i32, i64, i64)> = ItemEntity::find()
            .select_only()
            .column(clothing_item::Column::SellerId)
            .column_as(
                Expr::cust(r#"COALESCE(SUM("clothing_items"."likes_count"), 0)::bigint"#),
                "total_likes",
            )
            .column_as(clothing_item::Column::Id.count(), "items_count")
            .filter(clothing_item::Column::SellerId.is_not_null())
            .group_by(clothing_item::Column::SellerId)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|(seller_id, total_likes, items_count)| {
                (
                    seller_id,
                    SellerStats {
                        total_likes,
                        items_count,
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sort;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(query: &CatalogQuery) -> String {
        listing_query(query).build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn test_default_listing_is_newest_first_with_seller_join() {
        let sql = sql(&CatalogQuery::default());

        assert!(sql.contains(r#"LEFT JOIN "users""#));
        assert!(sql.contains(r#"ORDER BY "clothing_items"."created_at" DESC, "clothing_items"."id" DESC"#));
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn test_search_covers_all_text_fields() {
        let sql = sql(&CatalogQuery {
            search: Some("anime".into()),
            ..Default::default()
        });

        assert!(sql.contains(r#""clothing_items"."name" ILIKE '%anime%'"#));
        assert!(sql.contains(r#""clothing_items"."description" ILIKE '%anime%'"#));
        assert!(sql.contains(r#"unnest("clothing_items"."tags")"#));
        assert!(sql.contains(r#"unnest("clothing_items"."keywords")"#));
    }

    #[test]
    fn test_search_filter_and_sort_compose() {
        let sql = sql(&CatalogQuery {
            search: Some("anime".into()),
            item_type: Some("Goth".into()),
            tags: vec!["dark".into()],
            seller_id: Some(9),
            sort: Sort {
                key: SortKey::Price,
                order: SortOrder::Asc,
            },
        });

        assert!(sql.contains("ILIKE '%anime%'"));
        assert!(sql.contains(r#""clothing_items"."type" = 'Goth'"#));
        assert!(sql.contains(r#""clothing_items"."tags" && ARRAY"#));
        assert!(sql.contains("'dark'"));
        assert!(sql.contains(r#""clothing_items"."seller_id" = 9"#));
        assert!(sql.contains(r#"ORDER BY "clothing_items"."price" ASC, "clothing_items"."id" DESC"#));
        assert_eq!(sql.matches(" AND ").count(), 3);
    }

    #[test]
    fn test_popularity_sorts_by_likes_descending() {
        let sql = sql(&CatalogQuery {
            sort: Sort {
                key: SortKey::Popularity,
                order: SortOrder::Asc,
            },
            ..Default::default()
        });

        assert!(sql.contains(r#"ORDER BY "clothing_items"."likes_count" DESC"#));
    }

    #[test]
    fn test_orphaned_item_gets_placeholder_seller() {
        let item = clothing_item::Model {
            id: 1,
            name: "Cool Hat".into(),
            description: "d".into(),
            external_id: "42".into(),
            price: 50,
            item_type: "Pants".into(),
            tags: vec![],
            keywords: vec![],
            seller_id: None,
            likes_count: 0,
            created_at: chrono::Utc::now(),
        };

        let row = with_seller(item, None);
        assert_eq!(row.seller.username, "unknown seller");
    }
}
