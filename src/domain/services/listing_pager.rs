// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::crawlers::site_adapter::SiteAdapter;
use crate::domain::models::notice::NoticeStub;
use crate::engines::traits::BrowserPage;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

/// 单个列表页的解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingScan {
    /// 截止之前解析出的行
    pub stubs: Vec<NoticeStub>,
    /// 匹配行选择器的行数
    pub row_count: usize,
    /// 是否遇到了早于最小年份的行
    pub hit_cutoff: bool,
}

/// 解析列表页快照
///
/// 第一条年份严格小于 `min_year` 的记录触发截止，它和同页之后的行都被丢弃。
/// 日期无法解析的记录不会触发截止。
pub fn scan_listing(
    adapter: &dyn SiteAdapter,
    html: &str,
    listing_url: &str,
    min_year: i32,
) -> ListingScan {
    let selector = match Selector::parse(adapter.row_selector()) {
        Ok(selector) => selector,
        Err(e) => {
            warn!("Invalid row selector '{}': {:?}", adapter.row_selector(), e);
            return ListingScan::default();
        }
    };

    let document = Html::parse_document(html);
    let rows: Vec<_> = document.select(&selector).collect();

    let mut scan = ListingScan {
        row_count: rows.len(),
        ..ListingScan::default()
    };
    for row in rows {
        let Some(stub) = adapter.parse_row(row, listing_url) else {
            continue;
        };
        if stub.year().is_some_and(|year| year < min_year) {
            scan.hit_cutoff = true;
            break;
        }
        scan.stubs.push(stub);
    }
    scan
}

/// 列表分页器
///
/// 拉取式的单遍序列：每次 `next_batch` 导航一页并返回该页的记录，
/// 不会缓存超过一页的数据。序列在以下情况结束：
/// - 适配器报告没有更多页面，或导航失败
/// - 页面没有行，或没有可解析的记录
/// - 上一页触发了年份截止
/// - 达到 `max_pages`（`Some(0)` 与 `None` 相同，表示不限页数）
pub struct ListingPager<'a> {
    adapter: &'a dyn SiteAdapter,
    page: &'a dyn BrowserPage,
    url: &'a str,
    max_pages: Option<u32>,
    min_year: i32,
    board_name: &'a str,
    page_num: u32,
    finished: bool,
}

impl<'a> ListingPager<'a> {
    pub fn new(
        adapter: &'a dyn SiteAdapter,
        page: &'a dyn BrowserPage,
        url: &'a str,
        max_pages: Option<u32>,
        min_year: i32,
        board_name: &'a str,
    ) -> Self {
        Self {
            adapter,
            page,
            url,
            max_pages: max_pages.filter(|max| *max > 0),
            min_year,
            board_name,
            page_num: 0,
            finished: false,
        }
    }

    /// 最近一次导航的页码，从 1 开始
    pub fn page_num(&self) -> u32 {
        self.page_num
    }

    /// 导航到下一页并返回该页的记录；序列结束时返回 `None`
    pub async fn next_batch(&mut self) -> Option<Vec<NoticeStub>> {
        if self.finished {
            return None;
        }
        if self.max_pages.is_some_and(|max| self.page_num >= max) {
            debug!(board = self.board_name, url = self.url, "Reached max pages");
            return self.finish();
        }

        self.page_num += 1;
        let page_num = self.page_num;

        match self.adapter.navigate_to_page(self.page, self.url, page_num).await {
            Ok(true) => {}
            Ok(false) => return self.finish(),
            Err(e) => {
                warn!(board = self.board_name, url = self.url, page = page_num, "Listing navigation failed: {}", e);
                return self.finish();
            }
        }

        let html = match self.page.content().await {
            Ok(html) => html,
            Err(e) => {
                warn!(board = self.board_name, url = self.url, page = page_num, "Failed to read listing page: {}", e);
                return self.finish();
            }
        };

        let scan = scan_listing(self.adapter, &html, self.url, self.min_year);
        if scan.row_count == 0 {
            info!(board = self.board_name, page = page_num, "No more rows");
            return self.finish();
        }
        if scan.hit_cutoff {
            info!(board = self.board_name, page = page_num, min_year = self.min_year, "Reached notices older than cutoff year");
            self.finished = true;
        }
        if scan.stubs.is_empty() {
            return self.finish();
        }

        debug!(board = self.board_name, page = page_num, count = scan.stubs.len(), "Parsed listing page");
        Some(scan.stubs)
    }

    fn finish(&mut self) -> Option<Vec<NoticeStub>> {
        self.finished = true;
        None
    }
}
