/// Result of visiting one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitOutcome {
    Success,
    Failure(String),
}

impl VisitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, VisitOutcome::Success)
    }
}

/// Aggregate counts of a prewarm run.
///
/// `total` counts recorded outcomes, so `success_count + error_count == total`
/// holds by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub success_count: usize,
    pub error_count: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &VisitOutcome) {
        self.total += 1;
        if outcome.is_success() {
            self.success_count += 1;
        } else {
            self.error_count += 1;
        }
    }

    pub fn from_outcomes<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a VisitOutcome>,
    {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.record(outcome);
        }
        summary
    }

    pub fn success_rate(&self) -> f64 {
        if self.total > 0 {
            (self.success_count as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}
