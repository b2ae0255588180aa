// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

use crate::m20260101_000001_create_boards::Boards;

/// 创建公告表及其索引
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notices::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Notices::Url).string().not_null())
                    .col(ColumnDef::new(Notices::Title).string().not_null())
                    .col(ColumnDef::new(Notices::Author).string().null())
                    .col(ColumnDef::new(Notices::Date).string().not_null())
                    .col(ColumnDef::new(Notices::BoardId).uuid().not_null())
                    .col(ColumnDef::new(Notices::BoardName).string().not_null())
                    .col(
                        ColumnDef::new(Notices::Content)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Notices::Attachments).json().not_null())
                    .col(
                        ColumnDef::new(Notices::CrawledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notices_board_id")
                            .from(Notices::Table, Notices::BoardId)
                            .to(Boards::Table, Boards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // url is the only dedup key
        manager
            .create_index(
                Index::create()
                    .name("idx_notices_url")
                    .table(Notices::Table)
                    .col(Notices::Url)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notices_board_date")
                    .table(Notices::Table)
                    .col(Notices::BoardId)
                    .col((Notices::Date, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notices_date")
                    .table(Notices::Table)
                    .col((Notices::Date, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        // Full-text index for title + content, Postgres only
        if manager.get_database_backend() == DbBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared(
                    "CREATE INDEX IF NOT EXISTS idx_notices_title_content_text ON notices \
                     USING GIN (to_tsvector('simple', coalesce(title, '') || ' ' || coalesce(content, '')))",
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notices::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Notices {
    Table,
    Id,
    Url,
    Title,
    Author,
    Date,
    BoardId,
    BoardName,
    Content,
    Attachments,
    CrawledAt,
}
