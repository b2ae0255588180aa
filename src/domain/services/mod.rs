// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含增量爬取的核心业务逻辑：
/// - 列表分页（listing_pager）：逐页拉取列表记录并应用年份截止
/// - 爬取服务（crawl_service）：连续空页判定、详情抓取和按URL写入
pub mod crawl_service;
pub mod listing_pager;
