// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 创建公告板表
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    /// 应用数据库迁移
    ///
    /// # 参数
    ///
    /// * `manager` - 数据库模式管理器
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 迁移成功
    /// * `Err(DbErr)` - 迁移失败
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Boards::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Boards::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Boards::Name).string().not_null())
                    .col(ColumnDef::new(Boards::Slug).string().not_null())
                    .col(ColumnDef::new(Boards::Group).string().not_null())
                    .col(ColumnDef::new(Boards::Urls).json().not_null())
                    .col(ColumnDef::new(Boards::CrawlerType).string().not_null())
                    .col(
                        ColumnDef::new(Boards::Color)
                            .string()
                            .not_null()
                            .default("#9E9E9E"),
                    )
                    .col(
                        ColumnDef::new(Boards::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Boards::LastCrawledAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Boards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_boards_slug")
                    .table(Boards::Table)
                    .col(Boards::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_boards_group")
                    .table(Boards::Table)
                    .col(Boards::Group)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_boards_is_active")
                    .table(Boards::Table)
                    .col(Boards::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Boards::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Boards {
    Table,
    Id,
    Name,
    Slug,
    Group,
    Urls,
    CrawlerType,
    Color,
    IsActive,
    LastCrawledAt,
    CreatedAt,
}
