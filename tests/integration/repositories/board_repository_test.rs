// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::{board, create_test_db, insert_board};
use chrono::{Duration, Utc};
use noticrawl::domain::models::board::BoardFilter;
use noticrawl::domain::repositories::board_repository::BoardRepository;
use noticrawl::domain::repositories::RepositoryError;
use noticrawl::infrastructure::database::seed::seed_boards;
use uuid::Uuid;

#[tokio::test]
async fn test_find_active_filters_by_slug_and_skips_inactive() {
    let db = create_test_db().await;
    let now = Utc::now();

    let mut first = board("first", "a");
    first.created_at = now - Duration::minutes(2);
    let mut second = board("second", "a");
    second.created_at = now - Duration::minutes(1);
    let mut hidden = board("hidden", "a");
    hidden.is_active = false;
    for b in [&first, &second, &hidden] {
        insert_board(&db, b).await;
    }

    let all = db.boards.find_active(&BoardFilter::default()).await.unwrap();
    let slugs: Vec<_> = all.iter().map(|b| b.slug.as_str()).collect();
    assert_eq!(slugs, vec!["first", "second"]);

    let filter = BoardFilter::with_slugs(&["second".to_string(), "hidden".to_string()]);
    let filtered = db.boards.find_active(&filter).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].slug, "second");
    assert_eq!(filtered[0].urls, second.urls);
}

#[tokio::test]
async fn test_set_last_crawled_at() {
    let db = create_test_db().await;
    let b = board("stamp", "a");
    insert_board(&db, &b).await;

    let stamp = Utc::now();
    db.boards.set_last_crawled_at(b.id, stamp).await.unwrap();

    let stored = db.boards.find_by_id(b.id).await.unwrap().unwrap();
    let stored_at = stored.last_crawled_at.expect("last_crawled_at should be set");
    assert!((stored_at - stamp).num_seconds().abs() < 1);
}

#[tokio::test]
async fn test_set_last_crawled_at_unknown_board() {
    let db = create_test_db().await;
    let result = db.boards.set_last_crawled_at(Uuid::new_v4(), Utc::now()).await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[tokio::test]
async fn test_upsert_seed_refreshes_slug_only() {
    let db = create_test_db().await;
    let original = board("old", "a");
    insert_board(&db, &original).await;

    let mut renamed = board("new", "b");
    renamed.name = original.name.clone();
    assert!(!db.boards.upsert_seed(&renamed).await.unwrap());

    let stored = db.boards.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored.slug, "new");
    assert_eq!(stored.crawler_type, "a");
    assert!(db.boards.find_by_id(renamed.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_seed_boards_is_idempotent() {
    let db = create_test_db().await;

    assert_eq!(seed_boards(db.boards.as_ref()).await.unwrap(), 6);
    assert_eq!(seed_boards(db.boards.as_ref()).await.unwrap(), 0);

    let boards = db.boards.find_active(&BoardFilter::default()).await.unwrap();
    assert_eq!(boards.len(), 6);
    let eng = boards.iter().find(|b| b.slug == "eng").unwrap();
    assert_eq!(eng.crawler_type, "eng");
    assert_eq!(eng.urls.len(), 2);
}
