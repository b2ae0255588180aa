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

use crate::{
    config::settings::CrawlSettings,
    domain::{
        models::{
            board::{Board, BoardFilter},
            crawl_result::{BoardStatus, CrawlCounts, CrawlResult, CrawlSummary},
        },
        repositories::{board_repository::BoardRepository, notice_repository::NoticeRepository},
        services::crawl_service::CrawlService,
    },
    engines::traits::BrowserDriver,
    infrastructure::crawlers::AdapterRegistry,
    utils::errors::CrawlError,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// 爬取编排用例
///
/// 解析公告板和适配器，负责浏览器会话的获取与释放，并汇总各公告板的结果。
/// 公告板之间严格顺序执行。
pub struct CrawlUseCase<BR, NR>
where
    BR: BoardRepository,
    NR: NoticeRepository,
{
    board_repo: Arc<BR>,
    notice_repo: Arc<NR>,
    registry: AdapterRegistry,
    driver: Arc<dyn BrowserDriver>,
    service: CrawlService<BR, NR>,
}

impl<BR, NR> CrawlUseCase<BR, NR>
where
    BR: BoardRepository + 'static,
    NR: NoticeRepository + 'static,
{
    pub fn new(
        board_repo: Arc<BR>,
        notice_repo: Arc<NR>,
        registry: AdapterRegistry,
        driver: Arc<dyn BrowserDriver>,
        settings: CrawlSettings,
    ) -> Self {
        let service = CrawlService::new(board_repo.clone(), notice_repo.clone(), settings);
        Self {
            board_repo,
            notice_repo,
            registry,
            driver,
            service,
        }
    }

    /// 爬取单个公告板
    ///
    /// 所有错误都转换为结果中的 `error` 字段，不会向上传播。
    ///
    /// # 参数
    ///
    /// * `board_id` - 公告板ID字符串
    pub async fn crawl_one(&self, board_id: &str) -> CrawlResult {
        let id = match Uuid::parse_str(board_id) {
            Ok(id) => id,
            Err(_) => {
                return CrawlResult::failure(board_id, CrawlError::InvalidBoardId(board_id.to_string()))
            }
        };

        let board = match self.board_repo.find_by_id(id).await {
            Ok(Some(board)) => board,
            Ok(None) => return CrawlResult::failure(board_id, CrawlError::BoardNotFound),
            Err(e) => return CrawlResult::failure(board_id, CrawlError::from(e)),
        };

        self.crawl_resolved(&board).await
    }

    /// 顺序爬取所有启用的公告板
    ///
    /// # 参数
    ///
    /// * `slugs` - 只爬取这些 slug 对应的公告板；为空或 `None` 时爬取全部
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlSummary)` - 每个公告板的结果，失败的公告板不计入总数
    /// * `Err(CrawlError)` - 查询公告板列表失败
    pub async fn crawl_many(&self, slugs: Option<&[String]>) -> Result<CrawlSummary, CrawlError> {
        let filter = slugs.map(BoardFilter::with_slugs).unwrap_or_default();
        let boards = self.board_repo.find_active(&filter).await?;
        info!("Crawling {} boards", boards.len());

        let mut summary = CrawlSummary::default();
        for board in &boards {
            summary.push(self.crawl_resolved(board).await);
        }

        info!(
            new = summary.total_new,
            updated = summary.total_updated,
            "Crawl run finished"
        );
        Ok(summary)
    }

    /// 所有启用的公告板
    pub async fn get_boards(&self) -> Result<Vec<Board>, CrawlError> {
        Ok(self.board_repo.find_active(&BoardFilter::default()).await?)
    }

    /// 按分组整理的启用公告板
    pub async fn get_boards_by_group(&self) -> Result<BTreeMap<String, Vec<Board>>, CrawlError> {
        let mut groups: BTreeMap<String, Vec<Board>> = BTreeMap::new();
        for board in self.get_boards().await? {
            groups.entry(board.group.clone()).or_default().push(board);
        }
        Ok(groups)
    }

    /// 每个启用公告板的最后爬取时间和公告数量
    pub async fn get_crawl_status(&self) -> Result<Vec<BoardStatus>, CrawlError> {
        let mut statuses = Vec::new();
        for board in self.get_boards().await? {
            let notice_count = self.notice_repo.count_by_board(board.id).await?;
            statuses.push(BoardStatus {
                name: board.name,
                slug: board.slug,
                last_crawled_at: board.last_crawled_at,
                notice_count,
            });
        }
        Ok(statuses)
    }

    async fn crawl_resolved(&self, board: &Board) -> CrawlResult {
        match self.run_board(board).await {
            Ok(counts) => CrawlResult::success(&board.name, counts),
            Err(e) => CrawlResult::failure(&board.name, e),
        }
    }

    async fn run_board(&self, board: &Board) -> Result<CrawlCounts, CrawlError> {
        let adapter = self
            .registry
            .get(&board.crawler_type)
            .ok_or_else(|| CrawlError::UnknownCrawlerType(board.crawler_type.clone()))?;

        let session = self.driver.acquire().await?;
        let outcome = self
            .service
            .crawl_board(board, adapter.as_ref(), session.as_ref())
            .await;

        if let Err(e) = session.release().await {
            warn!(board = %board.name, driver = self.driver.name(), "Failed to release browser session: {}", e);
        }
        outcome
    }
}
