// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 站点适配器模块
///
/// 定义各公告站点共享的解析与翻页能力，具体站点实现位于基础设施层。
pub mod site_adapter;
