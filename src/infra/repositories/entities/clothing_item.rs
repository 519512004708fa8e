//! Clothing item database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::ClothingItem;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "clothing_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub external_id: String,
    pub price: i32,
    #[sea_orm(column_name = "type")]
    pub item_type: String,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
    pub seller_id: Option<i32>,
    pub likes_count: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SellerId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Seller,
    #[sea_orm(has_many = "super::item_like::Entity")]
    Likes,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl Related<super::item_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ClothingItem {
    fn from(model: Model) -> Self {
        ClothingItem {
            id: model.id,
            name: model.name,
            description: model.description,
            external_id: model.external_id,
            price: model.price,
            item_type: model.item_type,
            tags: model.tags,
            keywords: model.keywords,
            seller_id: model.seller_id,
            likes_count: model.likes_count,
            created_at: model.created_at,
        }
    }
}
