//! Migration: Create clothing_items table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClothingItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClothingItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClothingItems::Name).text().not_null())
                    .col(ColumnDef::new(ClothingItems::Description).text().not_null())
                    .col(ColumnDef::new(ClothingItems::ExternalId).string().not_null())
                    .col(ColumnDef::new(ClothingItems::Price).integer().not_null())
                    .col(ColumnDef::new(ClothingItems::Type).string().not_null())
                    .col(
                        ColumnDef::new(ClothingItems::Tags)
                            .array(ColumnType::Text)
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .col(
                        ColumnDef::new(ClothingItems::Keywords)
                            .array(ColumnType::Text)
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .col(ColumnDef::new(ClothingItems::SellerId).integer().null())
                    .col(
                        ColumnDef::new(ClothingItems::LikesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ClothingItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clothing_items_seller")
                            .from(ClothingItems::Table, ClothingItems::SellerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Seller profile listings and aggregates
        manager
            .create_index(
                Index::create()
                    .name("idx_clothing_items_seller_id")
                    .table(ClothingItems::Table)
                    .col(ClothingItems::SellerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clothing_items_created_at")
                    .table(ClothingItems::Table)
                    .col(ClothingItems::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClothingItems::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum ClothingItems {
    Table,
    Id,
    Name,
    Description,
    ExternalId,
    Price,
    Type,
    Tags,
    Keywords,
    SellerId,
    LikesCount,
    CreatedAt,
}
