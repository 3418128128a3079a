//! Sitemap parsing and recursive resolution into a flat list of page URLs.

use log::{debug, error, info, warn};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;
use std::collections::HashMap;

use super::errors::{PrewarmResult, SitemapError};
use super::fetcher::SitemapFetcher;

/// Shape of a parsed sitemap document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<urlset>`: leaf page URLs
    UrlSet(Vec<String>),
    /// `<sitemapindex>`: child sitemap URLs
    Index(Vec<String>),
    /// Well-formed XML with any other root element
    Unrecognized,
}

#[derive(Debug, Deserialize)]
struct UrlSet {
    #[serde(rename = "url", default)]
    entries: Vec<LocEntry>,
}

#[derive(Debug, Deserialize)]
struct SitemapIndex {
    #[serde(rename = "sitemap", default)]
    entries: Vec<LocEntry>,
}

#[derive(Debug, Deserialize)]
struct LocEntry {
    loc: String,
}

fn locations(entries: Vec<LocEntry>) -> Vec<String> {
    entries
        .into_iter()
        .map(|entry| entry.loc.trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect()
}

/// Local name of the first element in the document.
fn root_element(xml: &str) -> PrewarmResult<Option<String>> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(Some(String::from_utf8_lossy(e.local_name().as_ref()).to_string()));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Parse raw sitemap XML into a [`SitemapDocument`].
///
/// Malformed XML, a document without any element, and an entry lacking
/// `<loc>` are all errors.
pub fn parse_sitemap(xml: &str) -> PrewarmResult<SitemapDocument> {
    let root = root_element(xml)?
        .ok_or_else(|| SitemapError::ParseError("document has no root element".to_string()))?;

    match root.as_str() {
        "urlset" => {
            let set: UrlSet = quick_xml::de::from_str(xml)?;
            Ok(SitemapDocument::UrlSet(locations(set.entries)))
        }
        "sitemapindex" => {
            let index: SitemapIndex = quick_xml::de::from_str(xml)?;
            Ok(SitemapDocument::Index(locations(index.entries)))
        }
        other => {
            debug!("[sitemap] unrecognized root element <{}>", other);
            Ok(SitemapDocument::Unrecognized)
        }
    }
}

/// State of one resolution: the current index chain and every finished node.
#[derive(Debug, Default)]
struct Walk {
    ancestors: Vec<String>,
    resolved: HashMap<String, Vec<String>>,
}

/// Resolves a sitemap, possibly a sitemap of sitemaps, into page URLs.
pub struct SitemapResolver<F> {
    fetcher: F,
}

impl<F: SitemapFetcher> SitemapResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Flatten the sitemap tree rooted at `sitemap_url` in document order.
    ///
    /// Never fails: a node that cannot be fetched or parsed is logged and
    /// contributes nothing, without affecting its siblings or ancestors.
    pub async fn resolve(&self, sitemap_url: &str) -> Vec<String> {
        let mut walk = Walk::default();
        self.resolve_node(sitemap_url, &mut walk).await
    }

    async fn resolve_node(&self, sitemap_url: &str, walk: &mut Walk) -> Vec<String> {
        let depth = walk.ancestors.len();
        if let Some(urls) = walk.resolved.get(sitemap_url) {
            debug!("[sitemap][depth={}] reusing {} already resolved", depth, sitemap_url);
            return urls.clone();
        }
        info!("[sitemap][depth={}] fetching: {}", depth, sitemap_url);

        let urls = match self.load(sitemap_url).await {
            Ok(SitemapDocument::UrlSet(urls)) => {
                debug!("[sitemap][depth={}] {} page URL(s) in {}", depth, urls.len(), sitemap_url);
                urls
            }
            Ok(SitemapDocument::Index(children)) => {
                info!(
                    "[sitemap][depth={}] sitemap index detected, resolving {} child sitemap(s)",
                    depth,
                    children.len()
                );
                walk.ancestors.push(sitemap_url.to_string());
                let mut urls = Vec::new();
                for child in &children {
                    if walk.ancestors.iter().any(|a| a == child) {
                        warn!("[sitemap][depth={}] skipping cyclic reference to {}", depth, child);
                        continue;
                    }
                    // recursion needs boxing, the future would be infinitely sized otherwise
                    let mut nested = Box::pin(self.resolve_node(child, walk)).await;
                    urls.append(&mut nested);
                }
                walk.ancestors.pop();
                urls
            }
            Ok(SitemapDocument::Unrecognized) => {
                warn!("[sitemap][depth={}] {} is neither a urlset nor a sitemap index", depth, sitemap_url);
                Vec::new()
            }
            Err(e) => {
                error!("[sitemap][depth={}] failed to load {}: {}", depth, sitemap_url, e);
                Vec::new()
            }
        };

        walk.resolved.insert(sitemap_url.to_string(), urls.clone());
        urls
    }

    async fn load(&self, sitemap_url: &str) -> PrewarmResult<SitemapDocument> {
        let body = self.fetcher.fetch(sitemap_url).await?;
        parse_sitemap(&body)
    }
}
