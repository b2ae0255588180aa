// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 公告板种子URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardUrl {
    /// 列表页地址
    pub url: String,
    /// 分类标签，例如 "학사공지"
    pub name: String,
}

impl BoardUrl {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

/// 公告板实体
///
/// 一个爬取来源：包含一个或多个种子URL，以及选择站点适配器的类型标签。
/// `last_crawled_at` 在每次爬取尝试后更新，不论成功与否。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// 唯一标识符
    pub id: Uuid,
    /// 显示名称
    pub name: String,
    /// 短标识，用于按 slug 选择公告板
    pub slug: String,
    /// 分组（学校、学院、学科、项目组）
    pub group: String,
    /// 种子URL列表
    pub urls: Vec<BoardUrl>,
    /// 站点适配器类型标签
    pub crawler_type: String,
    /// 界面颜色
    pub color: String,
    /// 是否启用
    pub is_active: bool,
    /// 最后爬取时间
    pub last_crawled_at: Option<DateTime<Utc>>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

/// 公告板查询过滤条件
#[derive(Debug, Clone, Default)]
pub struct BoardFilter {
    /// 仅选择这些 slug；为空时不过滤
    pub slugs: Option<Vec<String>>,
}

impl BoardFilter {
    pub fn with_slugs(slugs: &[String]) -> Self {
        Self {
            slugs: Some(slugs.to_vec()),
        }
    }

    /// 是否需要按 slug 过滤
    pub fn slug_set(&self) -> Option<&[String]> {
        self.slugs.as_deref().filter(|s| !s.is_empty())
    }
}
