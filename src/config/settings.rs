// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含数据库、浏览器、爬取策略和指标导出等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 爬取策略配置
    pub crawl: CrawlSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 是否以无头模式启动
    pub headless: bool,
    /// 远程 Chrome 调试地址，设置后不再本地启动浏览器
    pub remote_debugging_url: Option<String>,
    /// 页面导航超时（毫秒）
    pub navigation_timeout_ms: u64,
    /// 元素/下载事件等待超时（毫秒）
    pub element_timeout_ms: u64,
    /// 下载目录，下载会在开始后立即取消
    pub download_dir: Option<String>,
}

impl BrowserSettings {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }
}

/// 爬取策略配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSettings {
    /// 最早保留的年份，早于该年份的公告会触发截止
    pub min_year: i32,
    /// 每个种子URL最多翻页数，为空或 0 则不限制
    pub max_pages: Option<u32>,
    /// 连续多少页没有新增公告后停止，0 表示关闭该规则
    pub zero_streak_limit: u32,
}

/// 指标导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、配置文件和环境变量（前缀 `NOTICRAWL`，分隔符 `__`）
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("NOTICRAWL").separator("__"));

        builder.build()?.try_deserialize()
    }

    fn defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            // Default DB settings
            .set_default("database.url", "sqlite://noticrawl.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default browser settings
            .set_default("browser.headless", true)?
            .set_default("browser.navigation_timeout_ms", 30_000)?
            .set_default("browser.element_timeout_ms", 5_000)?
            // Default crawl settings
            .set_default("crawl.min_year", 2025)?
            .set_default("crawl.zero_streak_limit", 2)?
            // Default metrics settings
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize_without_sources() {
        let settings: Settings = Settings::defaults(Config::builder())
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.crawl.min_year, 2025);
        assert_eq!(settings.crawl.zero_streak_limit, 2);
        assert!(settings.crawl.max_pages.is_none());
        assert!(settings.browser.headless);
        assert_eq!(settings.browser.navigation_timeout(), Duration::from_secs(30));
        assert_eq!(settings.browser.element_timeout(), Duration::from_secs(5));
        assert!(!settings.metrics.enabled);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let settings: Settings = Settings::defaults(Config::builder())
            .unwrap()
            .set_override("crawl.min_year", 2023)
            .unwrap()
            .set_override("crawl.max_pages", 3)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.crawl.min_year, 2023);
        assert_eq!(settings.crawl.max_pages, Some(3));
    }
}
