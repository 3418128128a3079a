use std::fmt;

/// Error types for the cache prewarmer
#[derive(Debug)]
pub enum PrewarmError {
    /// Sitemap retrieval or parsing errors
    Sitemap(SitemapError),
    /// Browser session and navigation errors
    Browser(BrowserError),
    /// Configuration related errors
    Configuration(ConfigurationError),
}

/// Sitemap specific errors
#[derive(Debug)]
pub enum SitemapError {
    FetchFailed { url: String, reason: String },
    HttpStatus { url: String, status: u16 },
    EmptyResponse(String),
    ParseError(String),
}

/// Browser specific errors
#[derive(Debug)]
pub enum BrowserError {
    LaunchFailed(String),
    PageSetupFailed(String),
    NavigationFailed { url: String, reason: String },
    NavigationTimeout { url: String, timeout_ms: u64 },
    CloseFailed(String),
}

/// Configuration specific errors
#[derive(Debug)]
pub enum ConfigurationError {
    InvalidUrl(String),
    ValidationFailed(String),
    InvalidLogLevel(String),
}

impl fmt::Display for PrewarmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrewarmError::Sitemap(e) => write!(f, "Sitemap error: {}", e),
            PrewarmError::Browser(e) => write!(f, "Browser error: {}", e),
            PrewarmError::Configuration(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl fmt::Display for SitemapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SitemapError::FetchFailed { url, reason } => {
                write!(f, "Failed to fetch {}: {}", url, reason)
            }
            SitemapError::HttpStatus { url, status } => {
                write!(f, "Unexpected HTTP status {} for {}", status, url)
            }
            SitemapError::EmptyResponse(url) => write!(f, "Empty response body from {}", url),
            SitemapError::ParseError(msg) => write!(f, "Sitemap parsing failed: {}", msg),
        }
    }
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserError::LaunchFailed(msg) => write!(f, "Failed to launch browser: {}", msg),
            BrowserError::PageSetupFailed(msg) => write!(f, "Failed to set up page: {}", msg),
            BrowserError::NavigationFailed { url, reason } => {
                write!(f, "Navigation to {} failed: {}", url, reason)
            }
            BrowserError::NavigationTimeout { url, timeout_ms } => {
                write!(f, "Navigation to {} timed out after {}ms", url, timeout_ms)
            }
            BrowserError::CloseFailed(msg) => write!(f, "Failed to close browser: {}", msg),
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            ConfigurationError::ValidationFailed(msg) => {
                write!(f, "Configuration validation failed: {}", msg)
            }
            ConfigurationError::InvalidLogLevel(level) => {
                write!(f, "Invalid log level: {}", level)
            }
        }
    }
}

impl std::error::Error for PrewarmError {}
impl std::error::Error for SitemapError {}
impl std::error::Error for BrowserError {}
impl std::error::Error for ConfigurationError {}

impl From<url::ParseError> for PrewarmError {
    fn from(err: url::ParseError) -> Self {
        PrewarmError::Configuration(ConfigurationError::InvalidUrl(err.to_string()))
    }
}

impl From<quick_xml::Error> for PrewarmError {
    fn from(err: quick_xml::Error) -> Self {
        PrewarmError::Sitemap(SitemapError::ParseError(err.to_string()))
    }
}

impl From<quick_xml::DeError> for PrewarmError {
    fn from(err: quick_xml::DeError) -> Self {
        PrewarmError::Sitemap(SitemapError::ParseError(err.to_string()))
    }
}

impl From<SitemapError> for PrewarmError {
    fn from(err: SitemapError) -> Self {
        PrewarmError::Sitemap(err)
    }
}

impl From<BrowserError> for PrewarmError {
    fn from(err: BrowserError) -> Self {
        PrewarmError::Browser(err)
    }
}

impl From<ConfigurationError> for PrewarmError {
    fn from(err: ConfigurationError) -> Self {
        PrewarmError::Configuration(err)
    }
}

/// Result type alias for prewarm operations
pub type PrewarmResult<T> = Result<T, PrewarmError>;

impl PrewarmError {
    /// Whether the run can continue after this error.
    ///
    /// Sitemap node failures and per-page navigation failures are absorbed
    /// where they happen; session setup and configuration errors abort the run.
    pub fn is_recoverable(&self) -> bool {
        match self {
            PrewarmError::Sitemap(_) => true,
            PrewarmError::Browser(BrowserError::NavigationFailed { .. }) => true,
            PrewarmError::Browser(BrowserError::NavigationTimeout { .. }) => true,
            PrewarmError::Browser(BrowserError::CloseFailed(_)) => true,
            PrewarmError::Browser(BrowserError::LaunchFailed(_)) => false,
            PrewarmError::Browser(BrowserError::PageSetupFailed(_)) => false,
            PrewarmError::Configuration(_) => false,
        }
    }
}
