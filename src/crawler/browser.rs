//! Browser session abstraction and its Chromium implementation.
//!
//! The prewarmer only needs a small slice of a browser: launch, one tab,
//! viewport and user agent, navigation, close. The traits below capture that
//! slice so the visit loop can be driven by chromiumoxide in production and
//! by an in-memory fake in tests.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::EventLifecycleEvent;
use chromiumoxide::page::Page;
use futures::StreamExt;
use log::{debug, info};
use tokio::task::JoinHandle;

use super::config::BrowserOptions;
use super::errors::{BrowserError, PrewarmResult};

/// Starts browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, options: &BrowserOptions) -> PrewarmResult<Box<dyn BrowserSession>>;
}

/// A running browser process.
#[async_trait]
pub trait BrowserSession: Send {
    /// Open a new tab.
    async fn new_page(&mut self) -> PrewarmResult<Box<dyn BrowserPage>>;
    /// Shut the browser down. Consumes the session so it can only happen once.
    async fn close(self: Box<Self>) -> PrewarmResult<()>;
}

/// A single tab.
#[async_trait]
pub trait BrowserPage: Send {
    async fn set_viewport(&mut self, width: u32, height: u32) -> PrewarmResult<()>;
    async fn set_user_agent(&mut self, user_agent: &str) -> PrewarmResult<()>;
    /// Navigate and return once the page's network has gone almost idle.
    async fn navigate(&mut self, url: &str) -> PrewarmResult<()>;
}

/// Launches headless Chromium through chromiumoxide.
///
/// Uses `CHROME_EXECUTABLE` when set, otherwise chromiumoxide's own lookup.
#[derive(Debug, Default)]
pub struct ChromiumLauncher;

impl ChromiumLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self, options: &BrowserOptions) -> PrewarmResult<Box<dyn BrowserSession>> {
        let mut builder = BrowserConfig::builder().args(options.launch_args.clone());
        if !options.headless {
            builder = builder.with_head();
        }
        if let Ok(exe) = std::env::var("CHROME_EXECUTABLE") {
            info!("[browser] using CHROME_EXECUTABLE={}", exe);
            builder = builder.chrome_executable(exe);
        }

        let config = builder
            .build()
            .map_err(|e| BrowserError::LaunchFailed(format!("invalid browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        // the CDP connection only makes progress while the handler is polled
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("[browser] handler event error: {}", e);
                }
            }
        });

        info!("[browser] chromium launched");
        Ok(Box::new(ChromiumSession {
            browser,
            handler_task,
        }))
    }
}

struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn new_page(&mut self) -> PrewarmResult<Box<dyn BrowserPage>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageSetupFailed(e.to_string()))?;
        Ok(Box::new(ChromiumPage { page }))
    }

    async fn close(self: Box<Self>) -> PrewarmResult<()> {
        let ChromiumSession {
            mut browser,
            handler_task,
        } = *self;

        let closed = browser
            .close()
            .await
            .map_err(|e| BrowserError::CloseFailed(e.to_string()));
        let _ = browser.wait().await;
        let _ = handler_task.await;

        closed?;
        info!("[browser] chromium closed");
        Ok(())
    }
}

struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn set_viewport(&mut self, width: u32, height: u32) -> PrewarmResult<()> {
        self.page
            .execute(SetDeviceMetricsOverrideParams::new(width, height, 1.0, false))
            .await
            .map_err(|e| BrowserError::PageSetupFailed(format!("viewport: {}", e)))?;
        Ok(())
    }

    async fn set_user_agent(&mut self, user_agent: &str) -> PrewarmResult<()> {
        self.page
            .set_user_agent(SetUserAgentOverrideParams::new(user_agent))
            .await
            .map_err(|e| BrowserError::PageSetupFailed(format!("user agent: {}", e)))?;
        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> PrewarmResult<()> {
        let navigation_error = |e: chromiumoxide::error::CdpError| BrowserError::NavigationFailed {
            url: url.to_string(),
            reason: e.to_string(),
        };

        // subscribe first so idle events fired while goto is pending are buffered
        let mut lifecycle = self
            .page
            .event_listener::<EventLifecycleEvent>()
            .await
            .map_err(navigation_error)?;

        self.page.goto(url).await.map_err(navigation_error)?;
        let main_frame = self.page.mainframe().await.map_err(navigation_error)?;

        let mut watch = IdleWatch::default();
        while let Some(event) = lifecycle.next().await {
            let in_main_frame = main_frame.as_ref().map_or(true, |id| *id == event.frame_id);
            if in_main_frame && watch.observe(&event.name) {
                debug!("[browser] network almost idle: {}", url);
                return Ok(());
            }
        }

        Err(BrowserError::NavigationFailed {
            url: url.to_string(),
            reason: "lifecycle event stream closed before network idle".to_string(),
        }
        .into())
    }
}

/// Lifecycle event chromium emits once at most two connections stay open for 500ms.
const NETWORK_ALMOST_IDLE: &str = "networkAlmostIdle";

/// Follows main-frame lifecycle events of one navigation.
///
/// Idle only counts after the navigation's own `init`, so an idle event left
/// over from the previous document is ignored.
#[derive(Debug, Default)]
struct IdleWatch {
    navigation_started: bool,
}

impl IdleWatch {
    /// Feed one lifecycle event name; true once the new document went idle
    fn observe(&mut self, name: &str) -> bool {
        match name {
            "init" => {
                self.navigation_started = true;
                false
            }
            NETWORK_ALMOST_IDLE => self.navigation_started,
            _ => false,
        }
    }
}
