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

use crate::domain::models::notice::{Attachment, Notice, NoticeFields, UpsertOutcome};
use crate::domain::repositories::notice_repository::NoticeRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::notice as notice_entity;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// 公告仓库实现
pub struct NoticeRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl NoticeRepositoryImpl {
    /// 创建新的公告仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn to_domain(model: notice_entity::Model) -> Result<Notice, RepositoryError> {
        let attachments: Vec<Attachment> = serde_json::from_value(model.attachments)?;
        Ok(Notice {
            id: model.id,
            url: model.url,
            title: model.title,
            author: model.author,
            date: model.date,
            board_id: model.board_id,
            board_name: model.board_name,
            content: model.content,
            attachments,
            crawled_at: model.crawled_at.with_timezone(&Utc),
        })
    }

    fn differs(model: &notice_entity::Model, fields: &NoticeFields, attachments: &serde_json::Value) -> bool {
        model.title != fields.title
            || model.author != fields.author
            || model.date != fields.date
            || model.content != fields.content
            || &model.attachments != attachments
            || model.board_id != fields.board_id
            || model.board_name != fields.board_name
    }
}

#[async_trait]
impl NoticeRepository for NoticeRepositoryImpl {
    async fn find_by_url(&self, url: &str) -> Result<Option<Notice>, RepositoryError> {
        notice_entity::Entity::find()
            .filter(notice_entity::Column::Url.eq(url))
            .one(self.db.as_ref())
            .await?
            .map(Self::to_domain)
            .transpose()
    }

    async fn upsert_by_url(
        &self,
        url: &str,
        fields: &NoticeFields,
        crawled_at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, RepositoryError> {
        let attachments = serde_json::to_value(&fields.attachments)?;

        let model = notice_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            url: Set(url.to_string()),
            title: Set(fields.title.clone()),
            author: Set(fields.author.clone()),
            date: Set(fields.date.clone()),
            board_id: Set(fields.board_id),
            board_name: Set(fields.board_name.clone()),
            content: Set(fields.content.clone()),
            attachments: Set(attachments.clone()),
            crawled_at: Set(crawled_at.into()),
        };

        // The unique url index decides between insert and update
        let inserted = notice_entity::Entity::insert(model)
            .on_conflict(
                OnConflict::column(notice_entity::Column::Url)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;
        if inserted > 0 {
            return Ok(UpsertOutcome::inserted());
        }

        let existing = notice_entity::Entity::find()
            .filter(notice_entity::Column::Url.eq(url))
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        if !Self::differs(&existing, fields, &attachments) {
            return Ok(UpsertOutcome::unchanged());
        }

        // crawled_at keeps its first-seen value
        let mut active: notice_entity::ActiveModel = existing.into();
        active.title = Set(fields.title.clone());
        active.author = Set(fields.author.clone());
        active.date = Set(fields.date.clone());
        active.content = Set(fields.content.clone());
        active.attachments = Set(attachments);
        active.board_id = Set(fields.board_id);
        active.board_name = Set(fields.board_name.clone());
        active.update(self.db.as_ref()).await?;

        Ok(UpsertOutcome::modified())
    }

    async fn count_by_board(&self, board_id: Uuid) -> Result<u64, RepositoryError> {
        let count = notice_entity::Entity::find()
            .filter(notice_entity::Column::BoardId.eq(board_id))
            .count(self.db.as_ref())
            .await?;
        Ok(count)
    }
}
