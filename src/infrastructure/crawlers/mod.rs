// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 站点适配器实现
pub mod csai;
pub mod eng;
pub mod factory;
pub mod jbnu;
pub mod swuniv;

pub use factory::AdapterRegistry;
