// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DbErr;
use thiserror::Error;

/// 仓库接口模块
///
/// 定义持久化网关的抽象接口，领域层只依赖这些特质
pub mod board_repository;
pub mod notice_repository;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// JSON 列编码/解码错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}
