// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 站点适配器（crawlers）：各站点共享的解析与翻页抽象
/// - 领域模型（models）：公告板、公告和爬取结果
/// - 仓库接口（repositories）：数据持久化抽象接口
/// - 服务（services）：分页与增量爬取规则
///
/// 领域层只依赖抽象接口，不依赖具体的数据库或浏览器实现。
pub mod crawlers;
pub mod models;
pub mod repositories;
pub mod services;
