//! Sequential, paced visit loop over one browser session.

use log::info;
use tokio::time::{Instant, sleep, timeout};

use super::browser::{BrowserLauncher, BrowserPage, BrowserSession};
use super::config::{BrowserOptions, PacingConfig};
use super::errors::{BrowserError, PrewarmResult};
use super::logging::{PrewarmLogger, log_fatal};
use super::report::{RunSummary, VisitOutcome};

/// Visits URLs one after another so their rendered pages land in the cache.
///
/// Visits never overlap: each navigation is awaited, followed by the settle
/// delay, and consecutive visits are separated by the inter-page delay.
pub struct Prewarmer<L> {
    launcher: L,
    options: BrowserOptions,
    pacing: PacingConfig,
}

impl<L: BrowserLauncher> Prewarmer<L> {
    pub fn new(launcher: L, options: BrowserOptions, pacing: PacingConfig) -> Self {
        Self {
            launcher,
            options,
            pacing,
        }
    }

    /// Visit every URL in order and tally the outcomes.
    ///
    /// Only session setup can fail the run. The session is closed exactly
    /// once whenever it was launched, including when page setup fails.
    pub async fn run(&self, urls: &[String]) -> PrewarmResult<RunSummary> {
        let logger = PrewarmLogger::new(urls.len());

        let mut session = self.launcher.launch(&self.options).await?;
        let visited = self.visit_all(session.as_mut(), urls, &logger).await;
        if let Err(e) = session.close().await {
            log_fatal(&e);
        }

        let outcomes = visited?;
        let summary = RunSummary::from_outcomes(&outcomes);
        logger.log_final_summary(&summary);
        Ok(summary)
    }

    async fn visit_all(
        &self,
        session: &mut dyn BrowserSession,
        urls: &[String],
        logger: &PrewarmLogger,
    ) -> PrewarmResult<Vec<VisitOutcome>> {
        let mut page = session.new_page().await?;
        page.set_viewport(self.options.viewport_width, self.options.viewport_height)
            .await?;
        page.set_user_agent(&self.options.user_agent).await?;
        info!(
            "[prewarm] page ready ({}x{}, user agent {:?})",
            self.options.viewport_width, self.options.viewport_height, self.options.user_agent
        );

        let mut outcomes = Vec::with_capacity(urls.len());
        for (index, url) in urls.iter().enumerate() {
            logger.log_visit_start(index, url);
            let started = Instant::now();

            let outcome = match self.visit(page.as_mut(), url).await {
                Ok(()) => VisitOutcome::Success,
                Err(e) => VisitOutcome::Failure(e.to_string()),
            };
            logger.log_visit_outcome(url, &outcome, started.elapsed());
            outcomes.push(outcome);

            if index + 1 < urls.len() {
                sleep(self.pacing.delay_between_pages()).await;
            }
        }

        Ok(outcomes)
    }

    async fn visit(&self, page: &mut dyn BrowserPage, url: &str) -> PrewarmResult<()> {
        match timeout(self.pacing.navigation_timeout(), page.navigate(url)).await {
            Ok(navigated) => navigated?,
            Err(_) => {
                return Err(BrowserError::NavigationTimeout {
                    url: url.to_string(),
                    timeout_ms: self.pacing.navigation_timeout_ms,
                }
                .into());
            }
        }

        sleep(self.pacing.settle_delay()).await;
        Ok(())
    }
}
