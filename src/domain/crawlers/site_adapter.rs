// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::notice::{Attachment, NoticeDetail, NoticeStub};
use crate::engines::traits::{BrowserError, BrowserPage};
use crate::utils::content_normalizer::{element_text, normalize_content};
use crate::utils::url_utils::{append_query, resolve_url, same_host};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::warn;
use url::Url;

pub const DEFAULT_ROW_SELECTOR: &str = "table tbody tr";
pub const DEFAULT_CONTENT_SELECTOR: &str = ".view-content, .board-view-content, article, .contents";
pub const DEFAULT_ATTACHMENT_SELECTOR: &str =
    "a[href*='download'], a[href*='file'], .file-list a, .attachFile a";

const MAX_ATTACHMENT_NAME_CHARS: usize = 200;

/// 站点适配器特质
///
/// 每个公告站点实现一个适配器，提供行选择器、行解析、翻页和详情抓取。
/// 除 `crawler_type`、`base_domain` 和 `parse_row` 外都有默认实现。
///
/// 行解析在 HTML 快照上同步完成，浏览器只负责导航和点击。
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    /// 适配器类型标签，与公告板的 `crawler_type` 对应
    fn crawler_type(&self) -> &'static str;

    /// 站点根地址，例如 `https://csai.jbnu.ac.kr`
    fn base_domain(&self) -> &str;

    fn row_selector(&self) -> &str {
        DEFAULT_ROW_SELECTOR
    }

    fn pagination_param(&self) -> &str {
        "page"
    }

    fn content_selector(&self) -> &str {
        DEFAULT_CONTENT_SELECTOR
    }

    fn attachment_selector(&self) -> &str {
        DEFAULT_ATTACHMENT_SELECTOR
    }

    /// 列表页导航后的固定等待
    fn listing_settle(&self) -> Duration {
        Duration::from_secs(2)
    }

    /// 详情页导航后的固定等待
    fn detail_settle(&self) -> Duration {
        Duration::from_secs(1)
    }

    /// 解析列表中的一行，无法识别的行返回 `None`
    ///
    /// # 参数
    ///
    /// * `row` - 匹配 `row_selector` 的行元素
    /// * `listing_url` - 当前种子URL
    fn parse_row(&self, row: ElementRef<'_>, listing_url: &str) -> Option<NoticeStub>;

    /// 导航到列表的第 `page_num` 页
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 页面已加载
    /// * `Ok(false)` - 没有更多页面
    async fn navigate_to_page(
        &self,
        page: &dyn BrowserPage,
        url: &str,
        page_num: u32,
    ) -> Result<bool, BrowserError> {
        let target = append_query(url, self.pagination_param(), page_num);
        page.goto(&target).await?;
        page.wait(self.listing_settle()).await;
        Ok(true)
    }

    /// 抓取详情页正文与附件
    async fn parse_detail(
        &self,
        page: &dyn BrowserPage,
        url: &str,
    ) -> Result<NoticeDetail, BrowserError> {
        fetch_static_detail(self, page, url).await
    }
}

/// 默认的详情抓取：导航、等待、规范化正文并收集附件链接
pub async fn fetch_static_detail<A>(
    adapter: &A,
    page: &dyn BrowserPage,
    url: &str,
) -> Result<NoticeDetail, BrowserError>
where
    A: SiteAdapter + ?Sized,
{
    page.goto(url).await?;
    page.wait(adapter.detail_settle()).await;
    let html = page.content().await?;

    Ok(NoticeDetail {
        content: normalize_content(&html, adapter.content_selector()),
        attachments: collect_attachments(&html, adapter.attachment_selector(), adapter.base_domain()),
    })
}

/// 收集附件链接
///
/// 只保留名称非空且少于 200 个字符、链接为站内绝对路径或 http(s) 地址、
/// 且主机与站点根地址一致的锚点。
pub fn collect_attachments(html: &str, selector: &str, base_domain: &str) -> Vec<Attachment> {
    let selector = match Selector::parse(selector) {
        Ok(selector) => selector,
        Err(e) => {
            warn!("Invalid attachment selector '{}': {:?}", selector, e);
            return Vec::new();
        }
    };
    let base = match Url::parse(base_domain) {
        Ok(base) => base,
        Err(e) => {
            warn!("Invalid base domain '{}': {}", base_domain, e);
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    document
        .select(&selector)
        .filter_map(|anchor| {
            let name = element_text(anchor);
            if name.is_empty() || name.chars().count() >= MAX_ATTACHMENT_NAME_CHARS {
                return None;
            }

            let href = anchor.value().attr("href")?.trim();
            // Protocol-relative links point at another host
            let resolved = if href.starts_with("//") {
                return None;
            } else if href.starts_with('/') || href.starts_with("http") {
                resolve_url(&base, href).ok()?
            } else {
                return None;
            };

            if !same_host(&resolved, &base) {
                return None;
            }
            Some(Attachment {
                name,
                url: resolved.to_string(),
            })
        })
        .collect()
}

/// 行内直接子元素中的 `td` 单元格
pub fn row_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| cell.value().name() == "td")
        .collect()
}

/// 文本是否为非空的纯数字
pub fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// 编译静态选择器，用于适配器内的 `Lazy` 常量
pub fn static_selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector '{}': {:?}", css, e))
}
