use async_trait::async_trait;
use log::debug;
use spider::website::Website;

use super::errors::{PrewarmResult, SitemapError};

/// Retrieves the raw body of a sitemap document.
#[async_trait]
pub trait SitemapFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> PrewarmResult<String>;
}

/// Fetches sitemaps with a single-page spider scrape.
pub struct SpiderFetcher {
    user_agent: String,
}

impl SpiderFetcher {
    pub fn new(user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
        }
    }
}

#[async_trait]
impl SitemapFetcher for SpiderFetcher {
    async fn fetch(&self, url: &str) -> PrewarmResult<String> {
        let mut website = Website::new(url);
        website.with_user_agent(Some(self.user_agent.as_str()));
        // only the document itself, never the links inside it
        website.with_depth(0);

        website.scrape().await;

        let pages = website.get_pages().ok_or_else(|| SitemapError::FetchFailed {
            url: url.to_string(),
            reason: "no page downloaded".to_string(),
        })?;
        let page = pages.first().ok_or_else(|| SitemapError::FetchFailed {
            url: url.to_string(),
            reason: "empty page list".to_string(),
        })?;

        if !page.status_code.is_success() {
            return Err(SitemapError::HttpStatus {
                url: url.to_string(),
                status: page.status_code.as_u16(),
            }
            .into());
        }

        let body = page.get_html().to_string();
        if body.trim().is_empty() {
            return Err(SitemapError::EmptyResponse(url.to_string()).into());
        }

        debug!("[fetcher] fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

