// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::CrawlSettings;
use crate::domain::crawlers::site_adapter::SiteAdapter;
use crate::domain::models::board::{Board, BoardUrl};
use crate::domain::models::crawl_result::CrawlCounts;
use crate::domain::models::notice::{NoticeDetail, NoticeFields, NoticeStub};
use crate::domain::repositories::board_repository::BoardRepository;
use crate::domain::repositories::notice_repository::NoticeRepository;
use crate::domain::services::listing_pager::ListingPager;
use crate::engines::traits::BrowserSession;
use crate::utils::errors::CrawlError;
use chrono::Utc;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const NOTICES_INSERTED_TOTAL: &str = "noticrawl_notices_inserted_total";
pub const NOTICES_UPDATED_TOTAL: &str = "noticrawl_notices_updated_total";
pub const DETAIL_FAILURES_TOTAL: &str = "noticrawl_detail_failures_total";

/// 增量爬取服务
///
/// 按顺序消费每个种子URL的列表分页，跳过已有正文的公告，
/// 抓取其余公告的详情并按URL写入。
pub struct CrawlService<B: BoardRepository, N: NoticeRepository> {
    /// 公告板仓库
    board_repo: Arc<B>,
    /// 公告仓库
    notice_repo: Arc<N>,
    /// 截止年份、最大页数和连续空页上限
    settings: CrawlSettings,
}

impl<B: BoardRepository, N: NoticeRepository> CrawlService<B, N> {
    /// 创建新的爬取服务实例
    ///
    /// # 参数
    ///
    /// * `board_repo` - 公告板仓库
    /// * `notice_repo` - 公告仓库
    /// * `settings` - 爬取策略配置
    pub fn new(board_repo: Arc<B>, notice_repo: Arc<N>, settings: CrawlSettings) -> Self {
        Self {
            board_repo,
            notice_repo,
            settings,
        }
    }

    /// 爬取一个公告板
    ///
    /// 浏览器和页面结构错误只记录日志；持久化错误中止当前公告板。
    /// 无论结果如何都会更新 `last_crawled_at`。
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlCounts)` - 新增和更新的公告数
    /// * `Err(CrawlError)` - 持久化失败
    pub async fn crawl_board(
        &self,
        board: &Board,
        adapter: &dyn SiteAdapter,
        session: &dyn BrowserSession,
    ) -> Result<CrawlCounts, CrawlError> {
        info!(board = %board.name, crawler = adapter.crawler_type(), "Starting board crawl");
        let outcome = self.crawl_seeds(board, adapter, session).await;

        if let Err(e) = self.board_repo.set_last_crawled_at(board.id, Utc::now()).await {
            error!(board = %board.name, "Failed to record last crawl time: {}", e);
            if outcome.is_ok() {
                return Err(e.into());
            }
        }

        match &outcome {
            Ok(counts) => info!(board = %board.name, new = counts.new, updated = counts.updated, "Board crawl finished"),
            Err(e) => error!(board = %board.name, "Board crawl aborted: {}", e),
        }
        outcome
    }

    async fn crawl_seeds(
        &self,
        board: &Board,
        adapter: &dyn SiteAdapter,
        session: &dyn BrowserSession,
    ) -> Result<CrawlCounts, CrawlError> {
        let mut counts = CrawlCounts::default();
        for seed in &board.urls {
            counts += self.crawl_seed(board, seed, adapter, session).await?;
        }
        Ok(counts)
    }

    async fn crawl_seed(
        &self,
        board: &Board,
        seed: &BoardUrl,
        adapter: &dyn SiteAdapter,
        session: &dyn BrowserSession,
    ) -> Result<CrawlCounts, CrawlError> {
        debug!(board = %board.name, url = %seed.url, category = %seed.name, "Crawling seed URL");

        let mut pager = ListingPager::new(
            adapter,
            session.listing_page(),
            &seed.url,
            self.settings.max_pages,
            self.settings.min_year,
            &board.name,
        );

        let mut counts = CrawlCounts::default();
        let mut zero_streak = 0u32;

        while let Some(batch) = pager.next_batch().await {
            let mut page_new = 0u64;
            for stub in batch {
                let page_counts = self.process_stub(board, &stub, adapter, session).await?;
                page_new += page_counts.new;
                counts += page_counts;
            }

            if page_new > 0 {
                zero_streak = 0;
                continue;
            }

            zero_streak += 1;
            let limit = self.settings.zero_streak_limit;
            if limit > 0 && zero_streak >= limit {
                info!(
                    board = %board.name,
                    url = %seed.url,
                    page = pager.page_num(),
                    "No new notices in {} consecutive pages, stopping", zero_streak
                );
                break;
            }
        }

        Ok(counts)
    }

    /// 处理一条列表记录，返回本条贡献的计数
    async fn process_stub(
        &self,
        board: &Board,
        stub: &NoticeStub,
        adapter: &dyn SiteAdapter,
        session: &dyn BrowserSession,
    ) -> Result<CrawlCounts, CrawlError> {
        if let Some(existing) = self.notice_repo.find_by_url(&stub.url).await? {
            if existing.has_content() {
                return Ok(CrawlCounts::default());
            }
            debug!(url = %stub.url, "Recovering notice without content");
        }

        // An empty detail is persisted so the next run can recover it
        let detail = match adapter.parse_detail(session.detail_page(), &stub.url).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!(board = %board.name, url = %stub.url, "Failed to fetch notice detail: {}", e);
                counter!(DETAIL_FAILURES_TOTAL, "board" => board.slug.clone()).increment(1);
                NoticeDetail::default()
            }
        };

        let fields = NoticeFields::from_parts(stub, detail, board.id, &board.name);
        let outcome = self
            .notice_repo
            .upsert_by_url(&stub.url, &fields, Utc::now())
            .await?;

        let mut counts = CrawlCounts::default();
        if outcome.inserted_new {
            counts.new = 1;
            counter!(NOTICES_INSERTED_TOTAL, "board" => board.slug.clone()).increment(1);
        } else if outcome.modified {
            counts.updated = 1;
            counter!(NOTICES_UPDATED_TOTAL, "board" => board.slug.clone()).increment(1);
        }
        Ok(counts)
    }
}
