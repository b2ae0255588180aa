// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::RepositoryError;
use crate::engines::traits::BrowserError;
use thiserror::Error;

/// 爬取错误类型
///
/// 配置类错误（无效ID、公告板不存在、未知爬虫类型）在编排层转换为结果中的错误信息；
/// 持久化错误会中止当前公告板。
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Invalid board_id: {0}")]
    InvalidBoardId(String),

    #[error("Board not found")]
    BoardNotFound,

    #[error("Unknown crawler type: {0}")]
    UnknownCrawlerType(String),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
