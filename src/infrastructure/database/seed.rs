// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::board::{Board, BoardUrl};
use crate::domain::repositories::board_repository::BoardRepository;
use crate::domain::repositories::RepositoryError;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

struct SeedBoard {
    name: &'static str,
    slug: &'static str,
    group: &'static str,
    urls: &'static [(&'static str, &'static str)],
    crawler_type: &'static str,
    color: &'static str,
}

const INITIAL_BOARDS: &[SeedBoard] = &[
    SeedBoard {
        name: "학생공지",
        slug: "student",
        group: "전북대",
        urls: &[("https://www.jbnu.ac.kr/web/news/notice/sub01.do", "학생공지")],
        crawler_type: "jbnu",
        color: "#2196F3",
    },
    SeedBoard {
        name: "특강&세미나",
        slug: "seminar",
        group: "전북대",
        urls: &[("https://www.jbnu.ac.kr/web/news/notice/sub02.do", "특강&세미나")],
        crawler_type: "jbnu",
        color: "#2196F3",
    },
    SeedBoard {
        name: "공모/스터디",
        slug: "study",
        group: "전북대",
        urls: &[("https://www.jbnu.ac.kr/web/news/notice/sub05.do", "공모/스터디")],
        crawler_type: "jbnu",
        color: "#2196F3",
    },
    SeedBoard {
        name: "공과대학",
        slug: "eng",
        group: "단과대",
        urls: &[
            ("https://eng.jbnu.ac.kr/eng/38/notice", "공지사항"),
            ("https://eng.jbnu.ac.kr/freshman/34/notice", "신입생"),
        ],
        crawler_type: "eng",
        color: "#9E9E9E",
    },
    SeedBoard {
        name: "컴퓨터인공지능학부",
        slug: "csai",
        group: "학과",
        urls: &[
            ("https://csai.jbnu.ac.kr/csai/29105/subview.do", "학사공지"),
            ("https://csai.jbnu.ac.kr/csai/29106/subview.do", "장학공지"),
            ("https://csai.jbnu.ac.kr/csai/29107/subview.do", "취업공지"),
            ("https://csai.jbnu.ac.kr/csai/29108/subview.do", "행사공지"),
            ("https://csai.jbnu.ac.kr/csai/29109/subview.do", "기타공지"),
        ],
        crawler_type: "csai",
        color: "#4CAF50",
    },
    SeedBoard {
        name: "SW중심대학사업단",
        slug: "swuniv",
        group: "사업단",
        urls: &[("https://swuniv.jbnu.ac.kr/main/jbnusw?gc=605XOAS", "공지사항")],
        crawler_type: "swuniv",
        color: "#FF9800",
    },
];

/// 内置的初始公告板
pub fn initial_boards(now: DateTime<Utc>) -> Vec<Board> {
    INITIAL_BOARDS
        .iter()
        .map(|seed| Board {
            id: Uuid::new_v4(),
            name: seed.name.to_string(),
            slug: seed.slug.to_string(),
            group: seed.group.to_string(),
            urls: seed
                .urls
                .iter()
                .map(|(url, name)| BoardUrl::new(*url, *name))
                .collect(),
            crawler_type: seed.crawler_type.to_string(),
            color: seed.color.to_string(),
            is_active: true,
            last_crawled_at: None,
            created_at: now,
        })
        .collect()
}

/// 写入初始公告板
///
/// 按名称匹配：不存在时插入，已存在时只刷新 slug。
///
/// # 返回值
///
/// 新插入的公告板数量
pub async fn seed_boards(repo: &dyn BoardRepository) -> Result<usize, RepositoryError> {
    let mut inserted = 0;
    for board in initial_boards(Utc::now()) {
        if repo.upsert_seed(&board).await? {
            info!(board = %board.name, "Seeded board");
            inserted += 1;
        }
    }
    Ok(inserted)
}
