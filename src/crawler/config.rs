use std::time::Duration;
use url::Url;

use super::errors::{ConfigurationError, PrewarmResult};

/// Site whose page cache gets warmed.
pub const SITE_URL: &str = "https://votre-site.com";
/// Sitemap location relative to the site root.
pub const SITEMAP_PATH: &str = "/sitemap.xml";
/// Pause between two consecutive page visits.
pub const DELAY_BETWEEN_PAGES_MS: u64 = 2000;
/// Upper bound for a single navigation.
pub const NAVIGATION_TIMEOUT_MS: u64 = 30000;
/// Extra wait after a page reported completion, for deferred client-side work.
pub const SETTLE_DELAY_MS: u64 = 1000;
/// Identifies prewarm traffic to the target server.
pub const PREWARM_USER_AGENT: &str = "Mozilla/5.0 (compatible; CachePrewarmer/1.0)";
/// URLs containing any of these substrings are never visited.
pub const DEFAULT_EXCLUSIONS: [&str; 4] = [
    "/revue-de-presse/",
    "/saisie_bibliotheque/",
    "/saisie_videotheque/",
    "/espace-redaction/",
];

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure for the cache prewarmer.
///
/// Every value is fixed at build time; `Default` carries the constants above.
#[derive(Debug, Clone)]
pub struct PrewarmConfig {
    /// Base URL of the site
    pub site_url: String,
    /// Path of the root sitemap, joined onto `site_url`
    pub sitemap_path: String,
    /// Substring patterns excluded from the crawl
    pub exclusions: Vec<String>,
    /// Browser session options
    pub browser: BrowserOptions,
    /// Visit pacing
    pub pacing: PacingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Options used when launching and configuring the browser session
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub user_agent: String,
    pub headless: bool,
    /// Extra command line flags passed to the browser process
    pub launch_args: Vec<String>,
}

/// Timing of the visit loop, in milliseconds
#[derive(Debug, Clone)]
pub struct PacingConfig {
    pub delay_between_pages_ms: u64,
    pub navigation_timeout_ms: u64,
    pub settle_delay_ms: u64,
}

/// Configuration for logging behavior
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for PrewarmConfig {
    fn default() -> Self {
        Self {
            site_url: SITE_URL.to_string(),
            sitemap_path: SITEMAP_PATH.to_string(),
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
            browser: BrowserOptions::default(),
            pacing: PacingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            viewport_width: 1920,
            viewport_height: 1080,
            user_agent: PREWARM_USER_AGENT.to_string(),
            headless: true,
            launch_args: vec![
                "--no-sandbox".to_string(),
                "--disable-setuid-sandbox".to_string(),
            ],
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            delay_between_pages_ms: DELAY_BETWEEN_PAGES_MS,
            navigation_timeout_ms: NAVIGATION_TIMEOUT_MS,
            settle_delay_ms: SETTLE_DELAY_MS,
        }
    }
}

impl PacingConfig {
    pub fn delay_between_pages(&self) -> Duration {
        Duration::from_millis(self.delay_between_pages_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl PrewarmConfig {
    /// Absolute URL of the root sitemap
    pub fn sitemap_url(&self) -> PrewarmResult<Url> {
        let base = Url::parse(&self.site_url)?;
        Ok(base.join(&self.sitemap_path)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> PrewarmResult<()> {
        let base = Url::parse(&self.site_url)?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(ConfigurationError::InvalidUrl(format!(
                "site URL must be http or https: {}",
                self.site_url
            ))
            .into());
        }

        if self.pacing.navigation_timeout_ms == 0 {
            return Err(failed("Navigation timeout must be greater than 0"));
        }

        if self.pacing.delay_between_pages_ms > 60_000 {
            return Err(failed("Delay between pages should not exceed 60 seconds"));
        }

        if self.browser.user_agent.is_empty() {
            return Err(failed("User agent cannot be empty"));
        }

        if self.browser.viewport_width == 0 || self.browser.viewport_height == 0 {
            return Err(failed("Viewport dimensions must be greater than 0"));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigurationError::InvalidLogLevel(self.logging.level.clone()).into());
        }

        Ok(())
    }

    /// Initialize logging based on configuration; `RUST_LOG` still wins when set
    pub fn init_logging(&self) -> PrewarmResult<()> {
        use log::LevelFilter;

        let log_level = match self.logging.level.as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            other => return Err(ConfigurationError::InvalidLogLevel(other.to_string()).into()),
        };

        env_logger::Builder::new()
            .filter_level(log_level)
            .parse_default_env()
            .try_init()
            .map_err(|e| ConfigurationError::ValidationFailed(e.to_string()))?;

        Ok(())
    }
}

fn failed(msg: &str) -> super::errors::PrewarmError {
    ConfigurationError::ValidationFailed(msg.to_string()).into()
}
