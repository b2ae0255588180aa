// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use noticrawl::config::settings::{CrawlSettings, DatabaseSettings};
use noticrawl::domain::crawlers::site_adapter::SiteAdapter;
use noticrawl::domain::models::board::{Board, BoardUrl};
use noticrawl::domain::models::notice::NoticeStub;
use noticrawl::domain::repositories::board_repository::BoardRepository;
use noticrawl::infrastructure::database::connection;
use noticrawl::infrastructure::repositories::board_repo_impl::BoardRepositoryImpl;
use noticrawl::infrastructure::repositories::notice_repo_impl::NoticeRepositoryImpl;
use scraper::{ElementRef, Selector};
use std::sync::Arc;
use uuid::Uuid;

pub const LIST_URL: &str = "https://a.ac.kr/list";

/// 迁移后的内存 SQLite 数据库及其仓库
pub struct TestDb {
    pub boards: Arc<BoardRepositoryImpl>,
    pub notices: Arc<NoticeRepositoryImpl>,
}

pub async fn create_test_db() -> TestDb {
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
        min_connections: Some(1),
        connect_timeout: Some(5),
        idle_timeout: None,
    };
    let db = Arc::new(
        connection::connect_and_migrate(&settings)
            .await
            .expect("Failed to prepare test database"),
    );

    TestDb {
        boards: Arc::new(BoardRepositoryImpl::new(db.clone())),
        notices: Arc::new(NoticeRepositoryImpl::new(db)),
    }
}

pub fn crawl_settings() -> CrawlSettings {
    CrawlSettings {
        min_year: 2025,
        max_pages: None,
        zero_streak_limit: 2,
    }
}

pub fn board(slug: &str, crawler_type: &str) -> Board {
    Board {
        id: Uuid::new_v4(),
        name: format!("board {}", slug),
        slug: slug.to_string(),
        group: "학과".to_string(),
        urls: vec![BoardUrl::new(LIST_URL, "공지")],
        crawler_type: crawler_type.to_string(),
        color: "#9E9E9E".to_string(),
        is_active: true,
        last_crawled_at: None,
        created_at: Utc::now(),
    }
}

pub async fn insert_board(db: &TestDb, board: &Board) {
    assert!(db.boards.upsert_seed(board).await.unwrap());
}

pub fn page_url(n: u32) -> String {
    format!("{}?page={}", LIST_URL, n)
}

pub fn detail_url(id: &str) -> String {
    format!("https://a.ac.kr/view/{}", id)
}

/// 列表页：每行 `<td><a href=detail>title</a></td><td>date</td>`
pub fn listing(ids: &[&str], date: &str) -> String {
    let rows: String = ids
        .iter()
        .map(|id| {
            format!(
                "<tr><td><a href=\"{}\">title {}</a></td><td>{}</td></tr>",
                detail_url(id),
                id,
                date
            )
        })
        .collect();
    format!("<table><tbody>{}</tbody></table>", rows)
}

pub fn detail(id: &str) -> String {
    format!(
        "<html><body><article><p>body {}</p><table><tr><td>x</td><td>y</td></tr></table>\
         <div class=\"file-list\"><a href=\"/file/{}\">{}.pdf</a></div></article></body></html>",
        id, id, id
    )
}

/// 类型标签为 "a" 的测试站点适配器
pub struct TestAdapter;

#[async_trait]
impl SiteAdapter for TestAdapter {
    fn crawler_type(&self) -> &'static str {
        "a"
    }

    fn base_domain(&self) -> &str {
        "https://a.ac.kr"
    }

    fn content_selector(&self) -> &str {
        "article"
    }

    fn parse_row(&self, row: ElementRef<'_>, _listing_url: &str) -> Option<NoticeStub> {
        let anchor = Selector::parse("a").unwrap();
        let cell = Selector::parse("td").unwrap();
        let link = row.select(&anchor).next()?;
        Some(NoticeStub {
            url: link.value().attr("href")?.to_string(),
            title: link.text().collect(),
            author: None,
            date: row.select(&cell).nth(1)?.text().collect(),
        })
    }
}
