use log::{debug, error, info, warn};
use std::time::{Duration, Instant};

use super::errors::PrewarmError;
use super::report::{RunSummary, VisitOutcome};

const RULE_WIDTH: usize = 50;

/// Progress and summary logging for a prewarm run
pub struct PrewarmLogger {
    start_time: Instant,
    total: usize,
}

/// Log an error that ends the run, or a recoverable one raised outside the visit loop
pub fn log_fatal(err: &PrewarmError) {
    if err.is_recoverable() {
        warn!("⚠️  {}", err);
    } else {
        error!("❌ prewarm aborted: {}", err);
    }
}

impl PrewarmLogger {
    /// Create a logger for a run over `total` URLs
    pub fn new(total: usize) -> Self {
        Self {
            start_time: Instant::now(),
            total,
        }
    }

    /// Log the progress line of a visit; `index` is zero based
    pub fn log_visit_start(&self, index: usize, url: &str) {
        info!("[{}/{}] 🔄 loading: {}", index + 1, self.total, url);
    }

    /// Log how a visit ended
    pub fn log_visit_outcome(&self, url: &str, outcome: &VisitOutcome, elapsed: Duration) {
        match outcome {
            VisitOutcome::Success => {
                info!("   ✅ success ({:?})", elapsed);
                debug!("   visited {} in {:?}", url, elapsed);
            }
            VisitOutcome::Failure(reason) => {
                warn!("   ❌ error: {}", reason);
            }
        }
    }

    /// Get total elapsed time since logger creation
    pub fn get_total_elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log the final summary block
    pub fn log_final_summary(&self, summary: &RunSummary) {
        let rule = "=".repeat(RULE_WIDTH);
        info!("{}", rule);
        info!("📊 CACHE PREWARM SUMMARY");
        info!("{}", rule);
        info!("✅ Success: {}", summary.success_count);
        info!("❌ Errors: {}", summary.error_count);
        info!("📄 Total: {}", summary.total);
        info!("   Success rate: {:.1}%", summary.success_rate());
        info!("   Completed in {:?}", self.get_total_elapsed());
        info!("{}", rule);
    }
}
