// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::{board, create_test_db, insert_board};
use chrono::{Duration, Utc};
use noticrawl::domain::models::notice::{Attachment, NoticeFields, UpsertOutcome};
use noticrawl::domain::repositories::notice_repository::NoticeRepository;
use uuid::Uuid;

fn fields(board_id: Uuid, content: &str) -> NoticeFields {
    NoticeFields {
        title: "수강신청 안내".to_string(),
        author: Some("학사팀".to_string()),
        date: "2025-02-01".to_string(),
        content: content.to_string(),
        attachments: vec![Attachment {
            name: "안내.pdf".to_string(),
            url: "https://a.ac.kr/file/1".to_string(),
        }],
        board_id,
        board_name: "board test".to_string(),
    }
}

const URL: &str = "https://a.ac.kr/view/1";

#[tokio::test]
async fn test_upsert_inserts_then_reports_unchanged() {
    let db = create_test_db().await;
    let b = board("test", "a");
    insert_board(&db, &b).await;

    let first = db.notices.upsert_by_url(URL, &fields(b.id, "본문"), Utc::now()).await.unwrap();
    assert_eq!(first, UpsertOutcome::inserted());

    let second = db.notices.upsert_by_url(URL, &fields(b.id, "본문"), Utc::now()).await.unwrap();
    assert_eq!(second, UpsertOutcome::unchanged());

    let stored = db.notices.find_by_url(URL).await.unwrap().unwrap();
    assert_eq!(stored.title, "수강신청 안내");
    assert_eq!(stored.author.as_deref(), Some("학사팀"));
    assert_eq!(stored.attachments.len(), 1);
    assert!(stored.has_content());
}

#[tokio::test]
async fn test_upsert_modifies_and_keeps_first_crawl_time() {
    let db = create_test_db().await;
    let b = board("test", "a");
    insert_board(&db, &b).await;

    let first_seen = Utc::now() - Duration::days(3);
    db.notices.upsert_by_url(URL, &fields(b.id, ""), first_seen).await.unwrap();
    let recovered = db.notices.find_by_url(URL).await.unwrap().unwrap();
    assert!(!recovered.has_content());

    let outcome = db
        .notices
        .upsert_by_url(URL, &fields(b.id, "복구된 본문"), Utc::now())
        .await
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::modified());

    let stored = db.notices.find_by_url(URL).await.unwrap().unwrap();
    assert_eq!(stored.content, "복구된 본문");
    assert_eq!(stored.id, recovered.id);
    assert!((stored.crawled_at - first_seen).num_seconds().abs() < 1);
}

#[tokio::test]
async fn test_url_is_unique_across_boards() {
    let db = create_test_db().await;
    let one = board("one", "a");
    let two = board("two", "a");
    insert_board(&db, &one).await;
    insert_board(&db, &two).await;

    db.notices.upsert_by_url(URL, &fields(one.id, "본문"), Utc::now()).await.unwrap();
    let outcome = db.notices.upsert_by_url(URL, &fields(two.id, "본문"), Utc::now()).await.unwrap();
    assert_eq!(outcome, UpsertOutcome::modified());

    assert_eq!(db.notices.count_by_board(one.id).await.unwrap(), 0);
    assert_eq!(db.notices.count_by_board(two.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_count_by_board() {
    let db = create_test_db().await;
    let b = board("count", "a");
    insert_board(&db, &b).await;

    assert_eq!(db.notices.count_by_board(b.id).await.unwrap(), 0);
    for i in 0..3 {
        let url = format!("https://a.ac.kr/view/{}", i);
        db.notices.upsert_by_url(&url, &fields(b.id, "본문"), Utc::now()).await.unwrap();
    }
    assert_eq!(db.notices.count_by_board(b.id).await.unwrap(), 3);
    assert!(db.notices.find_by_url("https://a.ac.kr/view/9").await.unwrap().is_none());
}
