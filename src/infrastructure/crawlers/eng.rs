// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::crawlers::site_adapter::{is_numeric, row_cells, static_selector, SiteAdapter};
use crate::domain::models::notice::{Attachment, NoticeDetail, NoticeStub};
use crate::engines::traits::{BrowserError, BrowserPage};
use crate::utils::content_normalizer::{element_text, normalize_content};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};

const FILE_BUTTON: &str = ".file_item button";

static ANCHOR: Lazy<Selector> = Lazy::new(|| static_selector("a"));
static FILE_LABEL: Lazy<Selector> = Lazy::new(|| static_selector("span"));
static FILE_BUTTONS: Lazy<Selector> = Lazy::new(|| static_selector(FILE_BUTTON));
static FILE_ITEM: Lazy<Selector> = Lazy::new(|| static_selector(".file_item"));
static BUTTON: Lazy<Selector> = Lazy::new(|| static_selector("button"));

/// 공과대학 (eng.jbnu.ac.kr) 适配器
///
/// 站点是 Vue 单页应用：详情URL由列表URL和帖子编号拼出，必须带 `type=board`；
/// 附件只能通过点击按钮触发下载获得地址。
pub struct EngAdapter;

impl EngAdapter {
    /// 从详情页快照中找出每个附件的名称及其第一个按钮在 `FILE_BUTTON` 匹配中的序号
    ///
    /// 每个 `.file_item` 最多产生一个附件；没有名称或按钮的条目被跳过。
    fn file_buttons(html: &str) -> Vec<(usize, String)> {
        let document = Html::parse_document(html);
        let all_buttons: Vec<_> = document.select(&FILE_BUTTONS).map(|button| button.id()).collect();

        document
            .select(&FILE_ITEM)
            .filter_map(|item| {
                let name = item.select(&FILE_LABEL).next().map(element_text)?;
                if name.is_empty() {
                    return None;
                }
                let button = item.select(&BUTTON).next()?;
                let index = all_buttons.iter().position(|id| *id == button.id())?;
                Some((index, name))
            })
            .collect()
    }
}

#[async_trait]
impl SiteAdapter for EngAdapter {
    fn crawler_type(&self) -> &'static str {
        "eng"
    }

    fn base_domain(&self) -> &str {
        "https://eng.jbnu.ac.kr"
    }

    fn content_selector(&self) -> &str {
        ".content_wrap"
    }

    fn detail_settle(&self) -> Duration {
        Duration::from_secs(2)
    }

    fn parse_row(&self, row: ElementRef<'_>, listing_url: &str) -> Option<NoticeStub> {
        let cells = row_cells(row);
        if cells.len() < 4 {
            return None;
        }

        let post_id = element_text(cells[0]);
        if !is_numeric(&post_id) {
            return None;
        }

        let link = cells[1].select(&ANCHOR).next()?;
        let date: String = element_text(cells[3]).chars().take(10).collect();

        Some(NoticeStub {
            url: format!("{}/detail/{}?type=board", listing_url, post_id),
            title: element_text(link),
            author: Some(element_text(cells[2])),
            date,
        })
    }

    async fn parse_detail(
        &self,
        page: &dyn BrowserPage,
        url: &str,
    ) -> Result<NoticeDetail, BrowserError> {
        page.goto(url).await?;
        page.wait(self.detail_settle()).await;
        let html = page.content().await?;

        let content = normalize_content(&html, self.content_selector());
        let buttons = Self::file_buttons(&html);

        let mut attachments = Vec::with_capacity(buttons.len());
        for (index, name) in buttons {
            match page.click_for_download(FILE_BUTTON, index).await {
                Ok(download_url) => attachments.push(Attachment {
                    name,
                    url: download_url,
                }),
                Err(e) => {
                    warn!(url = %url, attachment = %name, "Failed to capture attachment download: {}", e);
                }
            }
        }
        debug!(url = %url, count = attachments.len(), "Captured attachments");

        Ok(NoticeDetail {
            content,
            attachments,
        })
    }
}
