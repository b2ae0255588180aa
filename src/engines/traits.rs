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

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 浏览器错误类型
#[derive(Error, Debug)]
pub enum BrowserError {
    /// 浏览器启动或连接失败
    #[error("Browser launch failed: {0}")]
    Launch(String),
    /// 页面导航失败
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// 超时
    #[error("Timeout: {0}")]
    Timeout(String),
    /// 元素不存在
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    /// 选择器语法错误
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
    /// 下载事件捕获失败
    #[error("Download failed: {0}")]
    Download(String),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

/// 浏览器页面特质
///
/// 一个可导航的标签页。选择器查询、文本和属性读取都在 `content()`
/// 返回的 HTML 快照上完成，这里只保留必须由浏览器执行的操作。
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// 导航到URL并等待页面静默（受导航超时约束）
    async fn goto(&self, url: &str) -> Result<(), BrowserError>;

    /// 当前文档的完整 HTML
    async fn content(&self) -> Result<String, BrowserError>;

    /// 选择器是否匹配到至少一个元素
    async fn exists(&self, selector: &str) -> Result<bool, BrowserError>;

    /// 点击第一个匹配元素并等待由此触发的导航完成
    async fn click_and_wait_for_navigation(&self, selector: &str) -> Result<(), BrowserError>;

    /// 点击第 `index` 个匹配元素，拦截下载事件并返回下载URL
    ///
    /// 下载在开始后立即取消，文件本身不会落盘。
    async fn click_for_download(&self, selector: &str, index: usize)
        -> Result<String, BrowserError>;

    /// 固定时长等待
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// 一次公告板爬取期间持有的浏览器会话
///
/// 同时打开两个独立页面：列表页用于翻页，详情页用于抓取正文，
/// 这样访问详情时不会丢失列表页的导航状态。
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// 列表页
    fn listing_page(&self) -> &dyn BrowserPage;

    /// 详情页
    fn detail_page(&self) -> &dyn BrowserPage;

    /// 释放页面与浏览器实例
    async fn release(self: Box<Self>) -> Result<(), BrowserError>;
}

/// 浏览器驱动特质
///
/// 由编排层在每次公告板爬取开始时获取会话，结束时无条件释放。
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// 获取一个新的浏览器会话
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>, BrowserError>;

    /// 驱动名称
    fn name(&self) -> &'static str;
}
