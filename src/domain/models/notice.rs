// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 附件值对象，没有独立身份，随公告整体替换
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

/// 公告实体
///
/// URL 是唯一的去重键；`crawled_at` 只在首次插入时写入。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub id: Uuid,
    /// 规范化的绝对URL
    pub url: String,
    pub title: String,
    pub author: Option<String>,
    /// 发布日期文本，通常以 `YYYY-MM-DD` 开头
    pub date: String,
    pub board_id: Uuid,
    /// 冗余存储的公告板名称
    pub board_name: String,
    /// 规范化后的正文
    pub content: String,
    pub attachments: Vec<Attachment>,
    /// 首次发现时间
    pub crawled_at: DateTime<Utc>,
}

impl Notice {
    /// 是否已经抓取过正文
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

/// 列表页单行解析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeStub {
    pub url: String,
    pub title: String,
    pub author: Option<String>,
    pub date: String,
}

impl NoticeStub {
    /// 取日期前四个字符作为年份，解析失败返回 `None`
    pub fn year(&self) -> Option<i32> {
        let prefix: String = self.date.chars().take(4).collect();
        if prefix.chars().count() < 4 {
            return None;
        }
        prefix.parse().ok()
    }
}

/// 详情页解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeDetail {
    pub content: String,
    pub attachments: Vec<Attachment>,
}

/// upsert 时覆盖写入的字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeFields {
    pub title: String,
    pub author: Option<String>,
    pub date: String,
    pub content: String,
    pub attachments: Vec<Attachment>,
    pub board_id: Uuid,
    pub board_name: String,
}

impl NoticeFields {
    pub fn from_parts(stub: &NoticeStub, detail: NoticeDetail, board_id: Uuid, board_name: &str) -> Self {
        Self {
            title: stub.title.clone(),
            author: stub.author.clone(),
            date: stub.date.clone(),
            content: detail.content,
            attachments: detail.attachments,
            board_id,
            board_name: board_name.to_string(),
        }
    }
}

/// upsert 结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// 新插入
    pub inserted_new: bool,
    /// 已存在且字段发生变化
    pub modified: bool,
}

impl UpsertOutcome {
    pub fn inserted() -> Self {
        Self {
            inserted_new: true,
            modified: false,
        }
    }

    pub fn modified() -> Self {
        Self {
            inserted_new: false,
            modified: true,
        }
    }

    pub fn unchanged() -> Self {
        Self::default()
    }
}
