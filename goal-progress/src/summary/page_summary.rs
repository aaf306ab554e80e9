//! Page summary types.

use super::outcome::PlaceholderOutcome;

/// Summary of one page update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSummary {
    /// Number of placeholders found.
    pub placeholders: usize,

    /// Number of placeholders whose content was replaced.
    pub rendered: usize,

    /// Number of placeholders naming an issue absent from its milestone.
    pub not_found: usize,

    /// Number of placeholders without a usable identifier.
    pub skipped: usize,

    /// Number of placeholders that failed to load or render.
    pub failed: usize,
}

impl PageSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the summary with a placeholder outcome.
    pub fn record(&mut self, outcome: &PlaceholderOutcome) {
        self.placeholders += 1;
        match outcome {
            PlaceholderOutcome::Rendered { .. } => self.rendered += 1,
            PlaceholderOutcome::NotFound { .. } => self.not_found += 1,
            PlaceholderOutcome::Skipped { .. } => self.skipped += 1,
            PlaceholderOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Adds the counts of another summary.
    pub fn merge(&mut self, other: &PageSummary) {
        self.placeholders += other.placeholders;
        self.rendered += other.rendered;
        self.not_found += other.not_found;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }

    /// Returns true if any placeholder failed or was skipped.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.skipped > 0
    }

    /// Returns true if every placeholder was rendered.
    #[must_use]
    pub fn all_success(&self) -> bool {
        self.rendered == self.placeholders
    }
}
