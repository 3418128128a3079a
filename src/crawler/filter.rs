/// Substring patterns that remove URLs from the crawl.
#[derive(Debug, Clone, Default)]
pub struct ExclusionRules {
    patterns: Vec<String>,
}

impl ExclusionRules {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True when `url` contains any of the patterns
    pub fn is_excluded(&self, url: &str) -> bool {
        self.patterns.iter().any(|pattern| url.contains(pattern.as_str()))
    }

    /// Keep the URLs that match no pattern, preserving order
    pub fn apply(&self, urls: Vec<String>) -> Vec<String> {
        urls.into_iter().filter(|url| !self.is_excluded(url)).collect()
    }
}
