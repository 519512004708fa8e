//! Migration: Create item_likes table.
//!
//! Each row is owned by exactly one identity, and an identity can like a
//! given item at most once.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000002_create_clothing_items_table::ClothingItems;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ItemLikes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ItemLikes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ItemLikes::ItemId).integer().not_null())
                    .col(ColumnDef::new(ItemLikes::UserId).integer().null())
                    .col(ColumnDef::new(ItemLikes::IpAddress).string().null())
                    .col(
                        ColumnDef::new(ItemLikes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_item_likes_item")
                            .from(ItemLikes::Table, ItemLikes::ItemId)
                            .to(ClothingItems::Table, ClothingItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_item_likes_user")
                            .from(ItemLikes::Table, ItemLikes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Partial indexes and CHECK are not expressible through the builder
        let db = manager.get_connection();
        db.execute_unprepared(
            "ALTER TABLE item_likes ADD CONSTRAINT chk_item_likes_one_identity \
             CHECK ((user_id IS NULL) <> (ip_address IS NULL))",
        )
        .await?;
        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS uq_item_likes_item_user \
             ON item_likes (item_id, user_id) WHERE user_id IS NOT NULL",
        )
        .await?;
        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS uq_item_likes_item_ip \
             ON item_likes (item_id, ip_address) WHERE ip_address IS NOT NULL",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ItemLikes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ItemLikes {
    Table,
    Id,
    ItemId,
    UserId,
    IpAddress,
    CreatedAt,
}
