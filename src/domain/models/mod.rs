// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 公告板（board）：爬取来源及其种子URL
/// - 公告（notice）：以URL去重的公告记录及附件
/// - 爬取结果（crawl_result）：每次运行的计数与错误
pub mod board;
pub mod crawl_result;
pub mod notice;
