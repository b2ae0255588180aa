// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::crawlers::site_adapter::{is_numeric, row_cells, static_selector, SiteAdapter};
use crate::domain::models::notice::NoticeStub;
use crate::engines::traits::{BrowserError, BrowserPage};
use crate::utils::content_normalizer::element_text;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static TITLE_LINK: Lazy<Selector> = Lazy::new(|| static_selector("td a"));

/// SW중심대학사업단 (swuniv.jbnu.ac.kr) 适配器
pub struct SwunivAdapter;

impl SwunivAdapter {
    fn resolve_href(&self, href: &str) -> String {
        if href.starts_with("http") {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{}{}", self.base_domain(), href)
        } else if href.starts_with('?') {
            format!("{}/main/jbnusw{}", self.base_domain(), href)
        } else {
            format!("{}/main/{}", self.base_domain(), href)
        }
    }
}

/// `YYYY-MM-DD` 形状的文本
fn is_date_shaped(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10 && bytes[4] == b'-' && bytes[7] == b'-'
}

#[async_trait]
impl SiteAdapter for SwunivAdapter {
    fn crawler_type(&self) -> &'static str {
        "swuniv"
    }

    fn base_domain(&self) -> &str {
        "https://swuniv.jbnu.ac.kr"
    }

    fn content_selector(&self) -> &str {
        ".content_wrap"
    }

    fn attachment_selector(&self) -> &str {
        "a[href*='download'], a[href*='file']"
    }

    fn parse_row(&self, row: ElementRef<'_>, _listing_url: &str) -> Option<NoticeStub> {
        let link = row.select(&TITLE_LINK).next()?;
        let href = link.value().attr("href").filter(|href| !href.is_empty())?;

        let texts: Vec<String> = row_cells(row).into_iter().map(element_text).collect();
        let date = texts
            .iter()
            .find(|text| is_date_shaped(text))
            .cloned()
            .unwrap_or_default();
        let author = texts
            .get(3)
            .filter(|text| !is_date_shaped(text) && !is_numeric(text) && text.chars().count() < 20)
            .cloned();

        Some(NoticeStub {
            url: self.resolve_href(href),
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
        page.goto(&format!("{}&do=list&page={}", url, page_num)).await?;
        page.wait(self.listing_settle()).await;
        Ok(true)
    }
}
