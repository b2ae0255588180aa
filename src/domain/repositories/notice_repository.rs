// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::RepositoryError;
use crate::domain::models::notice::{Notice, NoticeFields, UpsertOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 公告仓库特质
///
/// URL 上的唯一索引是唯一的去重机制；`upsert_by_url` 必须是单条记录级别的原子操作。
#[async_trait]
pub trait NoticeRepository: Send + Sync {
    /// 根据URL查找公告
    async fn find_by_url(&self, url: &str) -> Result<Option<Notice>, RepositoryError>;

    /// 按URL插入或更新公告
    ///
    /// # 参数
    ///
    /// * `url` - 去重键
    /// * `fields` - 每次都覆盖写入的字段
    /// * `crawled_at` - 仅在插入时写入的首次发现时间
    ///
    /// # 返回值
    ///
    /// * `Ok(UpsertOutcome)` - 是否新插入、是否修改了已有记录
    /// * `Err(RepositoryError)` - 写入失败
    async fn upsert_by_url(
        &self,
        url: &str,
        fields: &NoticeFields,
        crawled_at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, RepositoryError>;

    /// 统计某个公告板下的公告数量
    async fn count_by_board(&self, board_id: Uuid) -> Result<u64, RepositoryError>;
}
