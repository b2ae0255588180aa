// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 测试主模块
///
/// 集成测试使用内存 SQLite 和脚本化浏览器驱动，不依赖外部服务
mod integration;
