// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 脚本化浏览器驱动
//!
//! 不启动真实浏览器，按URL回放预先登记的 HTML。用于离线回放抓取结果和测试。

use crate::engines::traits::{BrowserDriver, BrowserError, BrowserPage, BrowserSession};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// 预先登记的站点内容
#[derive(Debug, Clone, Default)]
pub struct ScriptedSite {
    pages: HashMap<String, String>,
    links: HashMap<String, String>,
    downloads: HashMap<String, Vec<String>>,
}

impl ScriptedSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记URL对应的 HTML
    pub fn page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// 点击匹配 `selector` 的元素后导航到 `target`
    pub fn link(mut self, selector: impl Into<String>, target: impl Into<String>) -> Self {
        self.links.insert(selector.into(), target.into());
        self
    }

    /// 点击匹配 `selector` 的第 N 个元素触发第 N 个下载URL
    pub fn downloads(mut self, selector: impl Into<String>, urls: Vec<String>) -> Self {
        self.downloads.insert(selector.into(), urls);
        self
    }
}

/// 回放页面
pub struct ScriptedPage {
    site: Arc<ScriptedSite>,
    current: Mutex<Option<String>>,
    visits: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPage {
    fn new(site: Arc<ScriptedSite>, visits: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            site,
            current: Mutex::new(None),
            visits,
        }
    }

    async fn current_html(&self) -> Result<&str, BrowserError> {
        let current = self.current.lock().await;
        let url = current
            .as_deref()
            .ok_or_else(|| BrowserError::Other("no page loaded".to_string()))?;
        self.site
            .pages
            .get(url)
            .map(String::as_str)
            .ok_or_else(|| BrowserError::Other(format!("no fixture for {}", url)))
    }
}

fn count_matches(html: &str, selector: &str) -> Result<usize, BrowserError> {
    let selector = Selector::parse(selector)
        .map_err(|e| BrowserError::InvalidSelector(format!("{}: {:?}", selector, e)))?;
    Ok(Html::parse_document(html).select(&selector).count())
}

#[async_trait]
impl BrowserPage for ScriptedPage {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.visits.lock().await.push(url.to_string());
        if !self.site.pages.contains_key(url) {
            return Err(BrowserError::Navigation(format!("no fixture for {}", url)));
        }
        *self.current.lock().await = Some(url.to_string());
        Ok(())
    }

    async fn content(&self) -> Result<String, BrowserError> {
        self.current_html().await.map(str::to_string)
    }

    async fn exists(&self, selector: &str) -> Result<bool, BrowserError> {
        let html = self.current_html().await?;
        Ok(count_matches(html, selector)? > 0)
    }

    async fn click_and_wait_for_navigation(&self, selector: &str) -> Result<(), BrowserError> {
        if !self.exists(selector).await? {
            return Err(BrowserError::ElementNotFound(selector.to_string()));
        }
        let target = self
            .site
            .links
            .get(selector)
            .ok_or_else(|| BrowserError::Navigation(format!("{} does not navigate", selector)))?;
        self.goto(target).await
    }

    async fn click_for_download(
        &self,
        selector: &str,
        index: usize,
    ) -> Result<String, BrowserError> {
        let html = self.current_html().await?;
        if count_matches(html, selector)? <= index {
            return Err(BrowserError::ElementNotFound(format!("{}[{}]", selector, index)));
        }
        self.site
            .downloads
            .get(selector)
            .and_then(|urls| urls.get(index))
            .cloned()
            .ok_or_else(|| BrowserError::Timeout(format!("no download from {}[{}]", selector, index)))
    }

    async fn wait(&self, _duration: Duration) {}
}

/// 回放会话
pub struct ScriptedSession {
    listing: ScriptedPage,
    detail: ScriptedPage,
    released: Arc<AtomicUsize>,
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    fn listing_page(&self) -> &dyn BrowserPage {
        &self.listing
    }

    fn detail_page(&self) -> &dyn BrowserPage {
        &self.detail
    }

    async fn release(self: Box<Self>) -> Result<(), BrowserError> {
        self.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// 回放驱动
///
/// 记录所有导航过的URL以及会话获取/释放次数。
#[derive(Clone)]
pub struct ScriptedDriver {
    site: Arc<ScriptedSite>,
    visits: Arc<Mutex<Vec<String>>>,
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl ScriptedDriver {
    pub fn new(site: ScriptedSite) -> Self {
        Self {
            site: Arc::new(site),
            visits: Arc::new(Mutex::new(Vec::new())),
            acquired: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 创建单独的会话，供不经过编排层的调用方使用
    pub fn session(&self) -> ScriptedSession {
        ScriptedSession {
            listing: ScriptedPage::new(self.site.clone(), self.visits.clone()),
            detail: ScriptedPage::new(self.site.clone(), self.visits.clone()),
            released: self.released.clone(),
        }
    }

    /// 按顺序返回导航过的URL
    pub async fn visits(&self) -> Vec<String> {
        self.visits.lock().await.clone()
    }

    pub fn acquired_count(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released_count(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserDriver for ScriptedDriver {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.session()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
