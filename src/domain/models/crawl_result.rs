// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::ops::AddAssign;

/// 单个公告板的新增/更新计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlCounts {
    pub new: u64,
    pub updated: u64,
}

impl AddAssign for CrawlCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.new += rhs.new;
        self.updated += rhs.updated;
    }
}

/// 单个公告板的爬取结果，不持久化
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlResult {
    pub board_name: String,
    pub new_count: u64,
    pub updated_count: u64,
    pub error: Option<String>,
}

impl CrawlResult {
    pub fn success(board_name: impl Into<String>, counts: CrawlCounts) -> Self {
        Self {
            board_name: board_name.into(),
            new_count: counts.new,
            updated_count: counts.updated,
            error: None,
        }
    }

    pub fn failure(board_name: impl Into<String>, error: impl ToString) -> Self {
        Self {
            board_name: board_name.into(),
            new_count: 0,
            updated_count: 0,
            error: Some(error.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// 多个公告板的汇总结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub results: Vec<CrawlResult>,
    pub total_new: u64,
    pub total_updated: u64,
}

impl CrawlSummary {
    /// 追加一个结果；只有没有错误的结果计入总数
    pub fn push(&mut self, result: CrawlResult) {
        if !result.is_error() {
            self.total_new += result.new_count;
            self.total_updated += result.updated_count;
        }
        self.results.push(result);
    }
}

/// 公告板爬取状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardStatus {
    pub name: String,
    pub slug: String,
    pub last_crawled_at: Option<DateTime<Utc>>,
    pub notice_count: u64,
}
