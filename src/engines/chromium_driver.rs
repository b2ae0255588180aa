// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::traits::{BrowserDriver, BrowserError, BrowserPage, BrowserSession};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::browser::{
    CancelDownloadParams, EventDownloadWillBegin, SetDownloadBehaviorBehavior,
    SetDownloadBehaviorParams,
};
use chromiumoxide::cdp::browser_protocol::page::FrameId;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        BrowserError::Other(e.to_string())
    }
}

/// 下载事件是否来自该标签页的主框架；主框架未知时接受任何下载
fn started_in_frame(page_frame: Option<&FrameId>, event_frame: &FrameId) -> bool {
    page_frame.map_or(true, |frame| frame == event_frame)
}

/// Chromium 浏览器驱动
///
/// 基于 chromiumoxide 实现；每次 `acquire` 启动（或连接）一个浏览器实例，
/// 并打开列表页和详情页两个标签页。
pub struct ChromiumDriver {
    settings: BrowserSettings,
}

impl ChromiumDriver {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    async fn launch(&self) -> Result<(Browser, chromiumoxide::Handler, bool), BrowserError> {
        if let Some(url) = &self.settings.remote_debugging_url {
            info!("Connecting to remote Chrome instance at: {}", url);
            let (browser, handler) = Browser::connect(url).await.map_err(|e| {
                BrowserError::Launch(format!("Failed to connect to remote Chrome: {}", e))
            })?;
            return Ok((browser, handler, true));
        }

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.settings.navigation_timeout())
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");
        if !self.settings.headless {
            builder = builder.with_head();
        }

        let config = builder.build().map_err(BrowserError::Launch)?;
        let (browser, handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;
        Ok((browser, handler, false))
    }

    async fn enable_download_events(&self, browser: &Browser) -> Result<(), BrowserError> {
        let download_dir = self
            .settings
            .download_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("noticrawl-downloads").display().to_string());

        let params = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::Allow)
            .download_path(download_dir)
            .events_enabled(true)
            .build()
            .map_err(BrowserError::Other)?;
        browser.execute(params).await?;
        Ok(())
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let (mut browser, mut handler, remote) = self.launch().await?;

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let pages = async {
            self.enable_download_events(&browser).await?;
            let listing = browser.new_page("about:blank").await?;
            let detail = browser.new_page("about:blank").await?;
            Ok::<_, BrowserError>((listing, detail))
        }
        .await;

        let (listing, detail) = match pages {
            Ok(pages) => pages,
            Err(e) => {
                if !remote {
                    let _ = browser.close().await;
                }
                handler_task.abort();
                return Err(e);
            }
        };

        debug!("Browser session acquired (remote = {})", remote);
        let browser = Arc::new(browser);
        Ok(Box::new(ChromiumSession {
            listing: ChromiumPage::new(listing, browser.clone(), &self.settings),
            detail: ChromiumPage::new(detail, browser.clone(), &self.settings),
            browser,
            handler_task,
            remote,
        }))
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

/// 一次爬取的浏览器会话
pub struct ChromiumSession {
    browser: Arc<Browser>,
    handler_task: JoinHandle<()>,
    remote: bool,
    listing: ChromiumPage,
    detail: ChromiumPage,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    fn listing_page(&self) -> &dyn BrowserPage {
        &self.listing
    }

    fn detail_page(&self) -> &dyn BrowserPage {
        &self.detail
    }

    async fn release(self: Box<Self>) -> Result<(), BrowserError> {
        let ChromiumSession {
            browser,
            handler_task,
            remote,
            listing,
            detail,
        } = *self;

        let mut first_error = None;
        for page in [detail.into_page(), listing.into_page()] {
            if let Err(e) = page.close().await {
                warn!("Failed to close page: {}", e);
                first_error.get_or_insert(BrowserError::from(e));
            }
        }

        // A remote browser outlives the session
        if !remote {
            // Both pages are consumed above, leaving the session's handle as the only one
            match Arc::try_unwrap(browser) {
                Ok(mut browser) => {
                    if let Err(e) = browser.close().await {
                        warn!("Failed to close browser: {}", e);
                        first_error.get_or_insert(BrowserError::from(e));
                    }
                    let _ = browser.wait().await;
                }
                Err(_) => {
                    warn!("Browser still shared at release");
                    first_error.get_or_insert(BrowserError::Other(
                        "browser still shared at release".to_string(),
                    ));
                }
            }
        }
        handler_task.abort();

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// chromiumoxide 标签页
///
/// 下载事件由浏览器级会话发出（不带 session id），因此监听和取消都经由共享的 `Browser`。
pub struct ChromiumPage {
    page: Page,
    browser: Arc<Browser>,
    navigation_timeout: Duration,
    element_timeout: Duration,
}

impl ChromiumPage {
    fn new(page: Page, browser: Arc<Browser>, settings: &BrowserSettings) -> Self {
        Self {
            page,
            browser,
            navigation_timeout: settings.navigation_timeout(),
            element_timeout: settings.element_timeout(),
        }
    }

    /// 交出标签页并释放对浏览器的引用
    fn into_page(self) -> Page {
        self.page
    }

    /// 轮询 `document.readyState`，直到页面加载完成或超出截止时间
    async fn wait_until_ready(&self, deadline: Instant) -> Result<(), BrowserError> {
        loop {
            let state: String = self
                .page
                .evaluate("document.readyState")
                .await?
                .into_value()
                .map_err(|e| BrowserError::Other(e.to_string()))?;
            if state == "complete" {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(format!(
                    "document not ready (state = {})",
                    state
                )));
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        let deadline = Instant::now() + self.navigation_timeout;
        tokio::time::timeout(self.navigation_timeout, self.page.goto(url))
            .await
            .map_err(|_| BrowserError::Timeout(format!("navigation to {}", url)))?
            .map_err(|e| BrowserError::Navigation(format!("{}: {}", url, e)))?;
        self.wait_until_ready(deadline).await
    }

    async fn content(&self) -> Result<String, BrowserError> {
        Ok(self.page.content().await?)
    }

    async fn exists(&self, selector: &str) -> Result<bool, BrowserError> {
        let elements = self.page.find_elements(selector).await?;
        Ok(!elements.is_empty())
    }

    async fn click_and_wait_for_navigation(&self, selector: &str) -> Result<(), BrowserError> {
        let deadline = Instant::now() + self.navigation_timeout;
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| BrowserError::ElementNotFound(format!("{}: {}", selector, e)))?;
        element.click().await?;

        tokio::time::timeout(self.navigation_timeout, self.page.wait_for_navigation())
            .await
            .map_err(|_| BrowserError::Timeout(format!("navigation after clicking {}", selector)))?
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;
        self.wait_until_ready(deadline).await
    }

    async fn click_for_download(
        &self,
        selector: &str,
        index: usize,
    ) -> Result<String, BrowserError> {
        // Subscribe before clicking so the event cannot be missed
        let mut downloads = self.browser.event_listener::<EventDownloadWillBegin>().await?;
        let frame = self.page.mainframe().await?;

        let element = self
            .page
            .find_elements(selector)
            .await?
            .into_iter()
            .nth(index)
            .ok_or_else(|| BrowserError::ElementNotFound(format!("{}[{}]", selector, index)))?;
        element.click().await?;

        // Downloads started by other tabs are skipped
        let from_this_page = async {
            while let Some(event) = downloads.next().await {
                if started_in_frame(frame.as_ref(), &event.frame_id) {
                    return Some(event);
                }
            }
            None
        };
        let event = tokio::time::timeout(self.element_timeout, from_this_page)
            .await
            .map_err(|_| BrowserError::Timeout(format!("download from {}[{}]", selector, index)))?
            .ok_or_else(|| BrowserError::Download("event stream closed".to_string()))?;

        // Only the URL is needed
        if let Err(e) = self
            .browser
            .execute(CancelDownloadParams::new(event.guid.clone()))
            .await
        {
            debug!("Failed to cancel download {}: {}", event.guid, e);
        }

        Ok(event.url.clone())
    }
}
