//! In-memory collaborators for unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::browser::{BrowserLauncher, BrowserPage, BrowserSession};
use super::config::BrowserOptions;
use super::errors::{BrowserError, PrewarmResult, SitemapError};
use super::fetcher::SitemapFetcher;

/// Serves canned sitemap bodies; unknown URLs fail like a network error.
#[derive(Clone, Default)]
pub struct FakeFetcher {
    pages: Arc<HashMap<String, String>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        Arc::make_mut(&mut self.pages).insert(url.to_string(), body.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SitemapFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> PrewarmResult<String> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(|| {
            SitemapError::FetchFailed {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            }
            .into()
        })
    }
}

/// How the fake page reacts to a navigation.
#[derive(Clone, Debug)]
pub enum PageBehavior {
    Load,
    Fail(String),
    /// Never completes, so only the navigation timeout ends it
    Hang,
}

/// Records every browser call into a shared event log.
#[derive(Clone, Default)]
pub struct FakeLauncher {
    events: Arc<Mutex<Vec<String>>>,
    behaviors: Arc<HashMap<String, PageBehavior>>,
    fail_launch: bool,
    fail_page_setup: bool,
    fail_close: bool,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(mut self, url: &str, behavior: PageBehavior) -> Self {
        Arc::make_mut(&mut self.behaviors).insert(url.to_string(), behavior);
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub fn failing_page_setup(mut self) -> Self {
        self.fail_page_setup = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("goto ").map(str::to_string))
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.events().iter().filter(|e| *e == "close").count()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self, _options: &BrowserOptions) -> PrewarmResult<Box<dyn BrowserSession>> {
        if self.fail_launch {
            return Err(BrowserError::LaunchFailed("chrome not found".to_string()).into());
        }
        self.record("launch".to_string());
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl BrowserSession for FakeLauncher {
    async fn new_page(&mut self) -> PrewarmResult<Box<dyn BrowserPage>> {
        self.record("new_page".to_string());
        if self.fail_page_setup {
            return Err(BrowserError::PageSetupFailed("target closed".to_string()).into());
        }
        Ok(Box::new(self.clone()))
    }

    async fn close(self: Box<Self>) -> PrewarmResult<()> {
        self.record("close".to_string());
        if self.fail_close {
            return Err(BrowserError::CloseFailed("browser process already exited".to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserPage for FakeLauncher {
    async fn set_viewport(&mut self, width: u32, height: u32) -> PrewarmResult<()> {
        self.record(format!("viewport {}x{}", width, height));
        Ok(())
    }

    async fn set_user_agent(&mut self, user_agent: &str) -> PrewarmResult<()> {
        self.record(format!("user_agent {}", user_agent));
        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> PrewarmResult<()> {
        self.record(format!("goto {}", url));
        match self.behaviors.get(url).cloned().unwrap_or(PageBehavior::Load) {
            PageBehavior::Load => Ok(()),
            PageBehavior::Fail(reason) => Err(BrowserError::NavigationFailed {
                url: url.to_string(),
                reason,
            }
            .into()),
            PageBehavior::Hang => std::future::pending().await,
        }
    }
}
