//! Page update summary types and helpers.

mod outcome;
mod page_summary;

pub use outcome::PlaceholderOutcome;
pub use page_summary::PageSummary;
