//! Rewriting progress placeholders in an HTML page.
//!
//! Every placeholder is resolved as an independent unit of work. A failure
//! is logged and counted, leaves that placeholder untouched, and never
//! affects its siblings.

mod placeholder;

pub use placeholder::{find_placeholders, Placeholder, PLACEHOLDER_CLASS};

use crate::loader::{DataLoader, MilestoneSource};
use crate::render::ProgressRenderer;
use crate::summary::{PageSummary, PlaceholderOutcome};
use futures::stream::{self, StreamExt};
use std::ops::Range;
use tracing::{debug, error, info};

/// Default number of placeholders resolved at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Result of updating one page.
#[derive(Debug, Clone)]
pub struct PageUpdate {
    /// The rewritten HTML.
    pub html: String,

    /// Outcome of every placeholder, in document order.
    pub outcomes: Vec<PlaceholderOutcome>,

    /// Counts over `outcomes`.
    pub summary: PageSummary,
}

/// Replaces the content of every progress placeholder in `html`.
///
/// Up to `concurrency` placeholders are resolved at a time, completing in no
/// particular order.
pub async fn update_page<S: MilestoneSource>(
    html: &str,
    loader: &DataLoader<S>,
    renderer: &ProgressRenderer,
    concurrency: usize,
) -> PageUpdate {
    let placeholders = find_placeholders(html);
    debug!(count = placeholders.len(), "Found progress placeholders");

    let mut results: Vec<(usize, PlaceholderOutcome, Option<String>)> =
        stream::iter(placeholders.iter().enumerate())
            .map(|(index, placeholder)| async move {
                let (outcome, fragment) = process_placeholder(placeholder, loader, renderer).await;
                (index, outcome, fragment)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;
    results.sort_by_key(|(index, _, _)| *index);

    let mut replacements: Vec<(Range<usize>, String)> = Vec::new();
    let mut outcomes = Vec::with_capacity(results.len());
    let mut summary = PageSummary::new();
    for (index, outcome, fragment) in results {
        if let Some(fragment) = fragment {
            replacements.push((placeholders[index].content.clone(), fragment));
        }
        summary.record(&outcome);
        outcomes.push(outcome);
    }

    info!(
        placeholders = summary.placeholders,
        rendered = summary.rendered,
        not_found = summary.not_found,
        failed = summary.failed + summary.skipped,
        "Updated progress placeholders"
    );

    PageUpdate {
        html: splice(html, &replacements),
        outcomes,
        summary,
    }
}

async fn process_placeholder<S: MilestoneSource>(
    placeholder: &Placeholder,
    loader: &DataLoader<S>,
    renderer: &ProgressRenderer,
) -> (PlaceholderOutcome, Option<String>) {
    let Some(id) = placeholder.id.as_deref() else {
        error!("progress element is missing an id");
        return (
            PlaceholderOutcome::Skipped {
                reason: "progress element is missing an id".to_string(),
            },
            None,
        );
    };

    let issue = match loader.load_issue(id).await {
        Ok(Some(issue)) => issue,
        Ok(None) => {
            return (PlaceholderOutcome::NotFound { id: id.to_string() }, None);
        }
        Err(e) => return failed(id, &e),
    };

    match renderer.render(&issue) {
        Ok(fragment) => (
            PlaceholderOutcome::Rendered { id: id.to_string() },
            Some(fragment),
        ),
        Err(e) => failed(id, &e),
    }
}

fn failed(id: &str, e: &dyn std::error::Error) -> (PlaceholderOutcome, Option<String>) {
    error!(id, error = %e, "Error loading progress data");
    (
        PlaceholderOutcome::Failed {
            id: id.to_string(),
            error: e.to_string(),
        },
        None,
    )
}

/// Applies non-overlapping replacements sorted by position.
fn splice(html: &str, replacements: &[(Range<usize>, String)]) -> String {
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    for (range, fragment) in replacements {
        out.push_str(&html[cursor..range.start]);
        out.push_str(fragment);
        cursor = range.end;
    }
    out.push_str(&html[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splice_replaces_ranges() {
        let html = "<div>a</div><div>b</div>";
        let result = splice(html, &[(5..6, "x".to_string()), (17..18, "yz".to_string())]);

        assert_eq!(result, "<div>x</div><div>yz</div>");
    }

    #[test]
    fn splice_without_replacements_is_identity() {
        assert_eq!(splice("<p>unchanged</p>", &[]), "<p>unchanged</p>");
    }
}
