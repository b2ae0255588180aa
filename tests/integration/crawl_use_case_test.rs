// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    board, crawl_settings, create_test_db, detail, detail_url, insert_board, listing, page_url,
    TestAdapter, TestDb,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use noticrawl::application::use_cases::crawl_use_case::CrawlUseCase;
use noticrawl::domain::models::board::BoardUrl;
use noticrawl::domain::models::notice::{Notice, NoticeFields, UpsertOutcome};
use noticrawl::domain::repositories::board_repository::BoardRepository;
use noticrawl::domain::repositories::notice_repository::NoticeRepository;
use noticrawl::domain::repositories::RepositoryError;
use noticrawl::engines::scripted::{ScriptedDriver, ScriptedSite};
use noticrawl::infrastructure::crawlers::AdapterRegistry;
use noticrawl::infrastructure::repositories::board_repo_impl::BoardRepositoryImpl;
use noticrawl::infrastructure::repositories::notice_repo_impl::NoticeRepositoryImpl;
use sea_orm::DbErr;
use std::sync::Arc;
use uuid::Uuid;

const OTHER_LIST_URL: &str = "https://a.ac.kr/other";

/// 三条公告的列表页、空的第二页和对应详情页
fn site() -> ScriptedSite {
    let mut site = ScriptedSite::new()
        .page(page_url(1), listing(&["1", "2", "3"], "2025-03-02"))
        .page(page_url(2), listing(&[], "2025-03-02"))
        .page(format!("{}?page=1", OTHER_LIST_URL), listing(&["9"], "2025-04-01"))
        .page(format!("{}?page=2", OTHER_LIST_URL), listing(&[], "2025-04-01"));
    for id in ["1", "2", "3", "9"] {
        site = site.page(detail_url(id), detail(id));
    }
    site
}

fn use_case(
    db: &TestDb,
    driver: &ScriptedDriver,
) -> CrawlUseCase<BoardRepositoryImpl, NoticeRepositoryImpl> {
    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(TestAdapter));
    CrawlUseCase::new(
        db.boards.clone(),
        db.notices.clone(),
        registry,
        Arc::new(driver.clone()),
        crawl_settings(),
    )
}

#[tokio::test]
async fn test_crawl_one_end_to_end() {
    let db = create_test_db().await;
    let b = board("test", "a");
    insert_board(&db, &b).await;
    let driver = ScriptedDriver::new(site());
    let crawler = use_case(&db, &driver);

    let result = crawler.crawl_one(&b.id.to_string()).await;
    assert_eq!(result.board_name, b.name);
    assert_eq!(result.error, None);
    assert_eq!((result.new_count, result.updated_count), (3, 0));

    let stored = db.notices.find_by_url(&detail_url("2")).await.unwrap().unwrap();
    assert_eq!(stored.title, "title 2");
    assert_eq!(stored.date, "2025-03-02");
    assert_eq!(stored.board_id, b.id);
    assert!(stored.content.contains("body 2"));
    assert!(stored.content.contains("x | y"));
    assert_eq!(stored.attachments.len(), 1);
    assert_eq!(stored.attachments[0].url, "https://a.ac.kr/file/2");

    let refreshed = db.boards.find_by_id(b.id).await.unwrap().unwrap();
    assert!(refreshed.last_crawled_at.is_some());

    assert_eq!(driver.acquired_count(), 1);
    assert_eq!(driver.released_count(), 1);
}

#[tokio::test]
async fn test_second_run_finds_nothing_new() {
    let db = create_test_db().await;
    let b = board("test", "a");
    insert_board(&db, &b).await;
    let driver = ScriptedDriver::new(site());
    let crawler = use_case(&db, &driver);

    crawler.crawl_one(&b.id.to_string()).await;
    let visits_after_first = driver.visits().await.len();

    let again = crawler.crawl_one(&b.id.to_string()).await;
    assert_eq!(again.error, None);
    assert_eq!((again.new_count, again.updated_count), (0, 0));
    assert_eq!(db.notices.count_by_board(b.id).await.unwrap(), 3);

    // Existing notices with content are not fetched again
    let second_visits = &driver.visits().await[visits_after_first..];
    assert!(second_visits.iter().all(|url| !url.contains("/view/")));
}

#[tokio::test]
async fn test_crawl_one_reports_lookup_errors() {
    let db = create_test_db().await;
    let driver = ScriptedDriver::new(site());
    let crawler = use_case(&db, &driver);

    let invalid = crawler.crawl_one("not-a-uuid").await;
    assert_eq!(invalid.board_name, "not-a-uuid");
    assert_eq!(invalid.error.as_deref(), Some("Invalid board_id: not-a-uuid"));
    assert_eq!((invalid.new_count, invalid.updated_count), (0, 0));

    let missing_id = Uuid::new_v4().to_string();
    let missing = crawler.crawl_one(&missing_id).await;
    assert_eq!(missing.board_name, missing_id);
    assert_eq!(missing.error.as_deref(), Some("Board not found"));

    assert_eq!(driver.acquired_count(), 0);
}

#[tokio::test]
async fn test_unknown_crawler_type_does_not_touch_browser() {
    let db = create_test_db().await;
    let b = board("mystery", "zzz");
    insert_board(&db, &b).await;
    let driver = ScriptedDriver::new(site());
    let crawler = use_case(&db, &driver);

    let result = crawler.crawl_one(&b.id.to_string()).await;
    assert_eq!(result.board_name, b.name);
    assert_eq!(result.error.as_deref(), Some("Unknown crawler type: zzz"));
    assert_eq!(driver.acquired_count(), 0);

    let stored = db.boards.find_by_id(b.id).await.unwrap().unwrap();
    assert!(stored.last_crawled_at.is_none());
}

#[tokio::test]
async fn test_crawl_many_filters_and_totals() {
    let db = create_test_db().await;
    let main = board("main", "a");
    let mut other = board("other", "a");
    other.urls = vec![BoardUrl::new(OTHER_LIST_URL, "기타")];
    let broken = board("broken", "zzz");
    for b in [&main, &other, &broken] {
        insert_board(&db, b).await;
    }
    let driver = ScriptedDriver::new(site());
    let crawler = use_case(&db, &driver);

    let only_other = crawler
        .crawl_many(Some(["other".to_string()].as_slice()))
        .await
        .unwrap();
    assert_eq!(only_other.results.len(), 1);
    assert_eq!(only_other.results[0].board_name, other.name);
    assert_eq!(only_other.total_new, 1);

    let everything = crawler.crawl_many(None).await.unwrap();
    assert_eq!(everything.results.len(), 3);
    assert_eq!(everything.total_new, 3);
    assert_eq!(everything.total_updated, 0);

    let failed: Vec<_> = everything.results.iter().filter(|r| r.is_error()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].board_name, broken.name);

    assert_eq!(driver.acquired_count(), driver.released_count());
}

#[tokio::test]
async fn test_empty_slug_list_selects_all_boards() {
    let db = create_test_db().await;
    insert_board(&db, &board("main", "a")).await;
    let driver = ScriptedDriver::new(site());
    let crawler = use_case(&db, &driver);

    let no_slugs: Vec<String> = Vec::new();
    let summary = crawler.crawl_many(Some(no_slugs.as_slice())).await.unwrap();
    assert_eq!(summary.results.len(), 1);
    assert_eq!(summary.total_new, 3);
}

#[tokio::test]
async fn test_board_listing_and_status() {
    let db = create_test_db().await;
    let main = board("main", "a");
    let mut unit = board("unit", "a");
    unit.group = "사업단".to_string();
    unit.urls = vec![BoardUrl::new(OTHER_LIST_URL, "기타")];
    insert_board(&db, &main).await;
    insert_board(&db, &unit).await;
    let driver = ScriptedDriver::new(site());
    let crawler = use_case(&db, &driver);

    let groups = crawler.get_boards_by_group().await.unwrap();
    assert_eq!(groups.keys().map(String::as_str).collect::<Vec<_>>(), vec!["사업단", "학과"]);
    assert_eq!(groups["학과"][0].slug, "main");

    crawler.crawl_one(&main.id.to_string()).await;

    let status = crawler.get_crawl_status().await.unwrap();
    let main_status = status.iter().find(|s| s.slug == "main").unwrap();
    assert_eq!(main_status.notice_count, 3);
    assert!(main_status.last_crawled_at.is_some());
    let unit_status = status.iter().find(|s| s.slug == "unit").unwrap();
    assert_eq!(unit_status.notice_count, 0);
    assert!(unit_status.last_crawled_at.is_none());

    assert_eq!(crawler.get_boards().await.unwrap().len(), 2);
}

/// 对指定公告板的写入总是失败，其余调用交给真实仓库
struct FailingUpserts {
    inner: Arc<NoticeRepositoryImpl>,
    failing_board: Uuid,
}

#[async_trait]
impl NoticeRepository for FailingUpserts {
    async fn find_by_url(&self, url: &str) -> Result<Option<Notice>, RepositoryError> {
        self.inner.find_by_url(url).await
    }

    async fn upsert_by_url(
        &self,
        url: &str,
        fields: &NoticeFields,
        crawled_at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, RepositoryError> {
        if fields.board_id == self.failing_board {
            return Err(RepositoryError::Database(DbErr::Custom("disk full".to_string())));
        }
        self.inner.upsert_by_url(url, fields, crawled_at).await
    }

    async fn count_by_board(&self, board_id: Uuid) -> Result<u64, RepositoryError> {
        self.inner.count_by_board(board_id).await
    }
}

#[tokio::test]
async fn test_persistence_failure_is_isolated_to_its_board() {
    let db = create_test_db().await;
    let broken = board("broken", "a");
    let mut healthy = board("healthy", "a");
    healthy.urls = vec![BoardUrl::new(OTHER_LIST_URL, "기타")];
    insert_board(&db, &broken).await;
    insert_board(&db, &healthy).await;

    let driver = ScriptedDriver::new(site());
    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(TestAdapter));
    let notices = Arc::new(FailingUpserts {
        inner: db.notices.clone(),
        failing_board: broken.id,
    });
    let crawler = CrawlUseCase::new(
        db.boards.clone(),
        notices,
        registry,
        Arc::new(driver.clone()),
        crawl_settings(),
    );

    let summary = crawler.crawl_many(None).await.unwrap();
    assert_eq!(summary.results.len(), 2);

    let failed = summary.results.iter().find(|r| r.board_name == broken.name).unwrap();
    assert!(failed.error.as_deref().is_some_and(|e| e.contains("disk full")));
    let succeeded = summary.results.iter().find(|r| r.board_name == healthy.name).unwrap();
    assert_eq!(succeeded.error, None);
    assert_eq!(succeeded.new_count, 1);
    assert_eq!((summary.total_new, summary.total_updated), (1, 0));

    // Both sessions are released, including the one whose crawl failed
    assert_eq!(driver.acquired_count(), 2);
    assert_eq!(driver.released_count(), 2);

    let stamped = db.boards.find_by_id(broken.id).await.unwrap().unwrap();
    assert!(stamped.last_crawled_at.is_some());
    assert_eq!(db.notices.count_by_board(broken.id).await.unwrap(), 0);
}
