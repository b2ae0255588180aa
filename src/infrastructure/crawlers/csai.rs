// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::crawlers::site_adapter::{is_numeric, row_cells, static_selector, SiteAdapter};
use crate::domain::models::notice::NoticeStub;
use crate::utils::content_normalizer::element_text;
use crate::utils::url_utils::resolve_url;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use url::Url;

static TITLE_LINK: Lazy<Selector> = Lazy::new(|| static_selector("td.artclTitle a, td a"));

/// 컴퓨터인공지능학부 (csai.jbnu.ac.kr) 适配器
///
/// 置顶公告带有 `headline` 类或序号不是数字，跳过；日期中的 `.` 统一为 `-`。
pub struct CsaiAdapter;

#[async_trait]
impl SiteAdapter for CsaiAdapter {
    fn crawler_type(&self) -> &'static str {
        "csai"
    }

    fn base_domain(&self) -> &str {
        "https://csai.jbnu.ac.kr"
    }

    fn row_selector(&self) -> &str {
        ".artclTable tbody tr"
    }

    fn content_selector(&self) -> &str {
        ".artclView"
    }

    fn attachment_selector(&self) -> &str {
        ".artclItem a[href*='download'], .artclItem a[href*='file'], .file-wrap a"
    }

    fn parse_row(&self, row: ElementRef<'_>, listing_url: &str) -> Option<NoticeStub> {
        let class = row.value().attr("class").unwrap_or_default();
        if class.contains("headline") {
            return None;
        }

        let cells = row_cells(row);
        if let Some(first) = cells.first() {
            if !is_numeric(&element_text(*first)) {
                return None;
            }
        }

        let link = row.select(&TITLE_LINK).next()?;
        let href = link.value().attr("href").filter(|href| !href.is_empty())?;
        let base = Url::parse(listing_url)
            .or_else(|_| Url::parse(self.base_domain()))
            .ok()?;
        let url = resolve_url(&base, href).ok()?.to_string();

        let date = cells
            .get(3)
            .map(|cell| element_text(*cell).replace('.', "-"))
            .unwrap_or_default();
        let author = cells.get(2).map(|cell| element_text(*cell));

        Some(NoticeStub {
            url,
            title: element_text(link),
            author,
            date,
        })
    }
}
