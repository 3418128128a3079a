use log::{info, warn};

use super::browser::BrowserLauncher;
use super::config::PrewarmConfig;
use super::errors::PrewarmResult;
use super::fetcher::SitemapFetcher;
use super::filter::ExclusionRules;
use super::prewarmer::Prewarmer;
use super::report::RunSummary;
use super::sitemap::SitemapResolver;

/// Orchestration: sitemap -> exclusion filter -> paced browser visits -> summary
pub async fn run_prewarm<F, L>(config: &PrewarmConfig, fetcher: F, launcher: L) -> PrewarmResult<RunSummary>
where
    F: SitemapFetcher,
    L: BrowserLauncher,
{
    config.validate()?;
    let sitemap_url = config.sitemap_url()?;
    info!("🚀 starting cache prewarm for {}", config.site_url);

    let urls = SitemapResolver::new(fetcher).resolve(sitemap_url.as_str()).await;
    if urls.is_empty() {
        warn!("⚠️  no URL found in sitemap {}", sitemap_url);
        return Ok(RunSummary::default());
    }
    info!("✅ {} URL(s) found", urls.len());

    let rules = ExclusionRules::new(config.exclusions.clone());
    let urls = rules.apply(urls);
    info!(
        "📋 {} URL(s) after filtering ({} exclusion pattern(s))",
        urls.len(),
        rules.len()
    );

    let prewarmer = Prewarmer::new(launcher, config.browser.clone(), config.pacing.clone());
    prewarmer.run(&urls).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::errors::{ConfigurationError, PrewarmError};
    use crate::crawler::test_support::{FakeFetcher, FakeLauncher};

    fn config() -> PrewarmConfig {
        PrewarmConfig {
            site_url: "https://s".to_string(),
            exclusions: vec!["/private/".to_string()],
            ..PrewarmConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_prewarm_filters_before_visiting() {
        let fetcher = FakeFetcher::new().with_page(
            "https://s/sitemap.xml",
            "<urlset><url><loc>https://s/</loc></url><url><loc>https://s/private/a</loc></url><url><loc>https://s/b</loc></url></urlset>",
        );
        let launcher = FakeLauncher::new();

        let summary = run_prewarm(&config(), fetcher, launcher.clone()).await.unwrap();

        assert_eq!(summary, RunSummary { total: 2, success_count: 2, error_count: 0 });
        assert_eq!(launcher.navigations(), vec!["https://s/", "https://s/b"]);
    }

    #[tokio::test]
    async fn test_run_prewarm_skips_browser_when_sitemap_is_empty() {
        let launcher = FakeLauncher::new();

        let summary = run_prewarm(&config(), FakeFetcher::new(), launcher.clone()).await.unwrap();

        assert_eq!(summary, RunSummary::default());
        assert!(launcher.events().is_empty());
    }

    #[tokio::test]
    async fn test_run_prewarm_rejects_invalid_config() {
        let mut config = config();
        config.logging.level = "verbose".to_string();
        let fetcher = FakeFetcher::new();

        let result = run_prewarm(&config, fetcher.clone(), FakeLauncher::new()).await;

        assert!(matches!(
            result,
            Err(PrewarmError::Configuration(ConfigurationError::InvalidLogLevel(_)))
        ));
        assert!(fetcher.requests().is_empty());
    }
}
