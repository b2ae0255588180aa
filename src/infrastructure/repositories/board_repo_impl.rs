// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::board::{Board, BoardFilter, BoardUrl};
use crate::domain::repositories::board_repository::BoardRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::board as board_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{sea_query::Expr, *};
use std::sync::Arc;
use uuid::Uuid;

/// 公告板仓库实现
pub struct BoardRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl BoardRepositoryImpl {
    /// 创建新的公告板仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn to_domain(model: board_entity::Model) -> Result<Board, RepositoryError> {
        let urls: Vec<BoardUrl> = serde_json::from_value(model.urls)?;
        Ok(Board {
            id: model.id,
            name: model.name,
            slug: model.slug,
            group: model.group,
            urls,
            crawler_type: model.crawler_type,
            color: model.color,
            is_active: model.is_active,
            last_crawled_at: model.last_crawled_at.map(|t| t.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl BoardRepository for BoardRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Board>, RepositoryError> {
        board_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(Self::to_domain)
            .transpose()
    }

    async fn find_active(&self, filter: &BoardFilter) -> Result<Vec<Board>, RepositoryError> {
        let mut query = board_entity::Entity::find().filter(board_entity::Column::IsActive.eq(true));

        if let Some(slugs) = filter.slug_set() {
            query = query.filter(board_entity::Column::Slug.is_in(slugs.iter().cloned()));
        }

        query
            .order_by_asc(board_entity::Column::CreatedAt)
            .order_by_asc(board_entity::Column::Name)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Self::to_domain)
            .collect()
    }

    async fn set_last_crawled_at(
        &self,
        id: Uuid,
        timestamp: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = board_entity::Entity::update_many()
            .col_expr(
                board_entity::Column::LastCrawledAt,
                Expr::value(Some(DateTime::<FixedOffset>::from(timestamp))),
            )
            .filter(board_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn upsert_seed(&self, board: &Board) -> Result<bool, RepositoryError> {
        let existing = board_entity::Entity::find()
            .filter(board_entity::Column::Name.eq(board.name.as_str()))
            .one(self.db.as_ref())
            .await?;

        if let Some(existing) = existing {
            if existing.slug != board.slug {
                let mut active: board_entity::ActiveModel = existing.into();
                active.slug = Set(board.slug.clone());
                active.update(self.db.as_ref()).await?;
            }
            return Ok(false);
        }

        let model = board_entity::ActiveModel {
            id: Set(board.id),
            name: Set(board.name.clone()),
            slug: Set(board.slug.clone()),
            group: Set(board.group.clone()),
            urls: Set(serde_json::to_value(&board.urls)?),
            crawler_type: Set(board.crawler_type.clone()),
            color: Set(board.color.clone()),
            is_active: Set(board.is_active),
            last_crawled_at: Set(board.last_crawled_at.map(Into::into)),
            created_at: Set(board.created_at.into()),
        };
        model.insert(self.db.as_ref()).await?;
        Ok(true)
    }
}
