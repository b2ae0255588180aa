// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::crawlers::site_adapter::{static_selector, SiteAdapter};
use crate::domain::models::notice::NoticeStub;
use crate::engines::traits::{BrowserError, BrowserPage};
use crate::utils::content_normalizer::element_text;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::time::Duration;
use tracing::{info, warn};

static TITLE_LINK: Lazy<Selector> = Lazy::new(|| static_selector("td.td-title a, td a.title"));
static DATE_ITEM: Lazy<Selector> = Lazy::new(|| static_selector("ul.etc-list li"));
static CELL: Lazy<Selector> = Lazy::new(|| static_selector("td"));
static DETAIL_MOVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"pf_DetailMove\(['"]?(\d+)['"]?\)"#).unwrap());

/// 전북대학교 (www.jbnu.ac.kr) 适配器
///
/// 列表通过 `pf_LinkPage(N)` 表单提交翻页，因此第 1 页之后只能点击页码并等待导航。
pub struct JbnuAdapter;

#[async_trait]
impl SiteAdapter for JbnuAdapter {
    fn crawler_type(&self) -> &'static str {
        "jbnu"
    }

    fn base_domain(&self) -> &str {
        "https://www.jbnu.ac.kr"
    }

    fn content_selector(&self) -> &str {
        ".com-post-content-01"
    }

    fn attachment_selector(&self) -> &str {
        ".file-wrap a, .attachFile a, a[href*='fileDown']"
    }

    fn parse_row(&self, row: ElementRef<'_>, _listing_url: &str) -> Option<NoticeStub> {
        let link = row.select(&TITLE_LINK).next()?;
        let onclick = link.value().attr("onclick")?;
        let post_id = DETAIL_MOVE.captures(onclick)?.get(1)?.as_str();

        let date = row
            .select(&DATE_ITEM)
            .next()
            .map(element_text)
            .unwrap_or_default();
        let author = row.select(&CELL).nth(4).map(element_text);

        Some(NoticeStub {
            url: format!("{}/web/Board/{}/detailView.do", self.base_domain(), post_id),
            title: element_text(link),
            author,
            date,
        })
    }

    async fn navigate_to_page(
        &self,
        page: &dyn BrowserPage,
        url: &str,
        page_num: u32,
    ) -> Result<bool, BrowserError> {
        if page_num == 1 {
            page.goto(url).await?;
            page.wait(self.listing_settle()).await;
            return Ok(true);
        }

        let control = format!("[onclick=\"pf_LinkPage({})\"]", page_num);
        if !page.exists(&control).await? {
            info!(page = page_num, "Reached last listing page");
            return Ok(false);
        }

        match page.click_and_wait_for_navigation(&control).await {
            Ok(()) => {
                page.wait(Duration::from_secs(1)).await;
                Ok(true)
            }
            Err(e) => {
                warn!(page = page_num, "Failed to move to listing page: {}", e);
                Ok(false)
            }
        }
    }
}
