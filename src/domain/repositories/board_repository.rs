// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::RepositoryError;
use crate::domain::models::board::{Board, BoardFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 公告板仓库特质
///
/// 定义公告板数据访问接口。公告板由初始化种子创建，
/// 爬取流程只读取公告板并更新 `last_crawled_at`。
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// 根据ID查找公告板
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(Board))` - 找到公告板
    /// * `Ok(None)` - 未找到
    /// * `Err(RepositoryError)` - 查询失败
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Board>, RepositoryError>;

    /// 查询启用的公告板，可按 slug 集合过滤
    async fn find_active(&self, filter: &BoardFilter) -> Result<Vec<Board>, RepositoryError>;

    /// 记录最后爬取时间
    async fn set_last_crawled_at(
        &self,
        id: Uuid,
        timestamp: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// 写入种子公告板
    ///
    /// 按名称匹配：不存在则插入整条记录；已存在则只刷新 slug。
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 新插入
    /// * `Ok(false)` - 已存在
    async fn upsert_seed(&self, board: &Board) -> Result<bool, RepositoryError>;
}
