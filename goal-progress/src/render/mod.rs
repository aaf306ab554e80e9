//! Progress fragment rendering.
//!
//! This module maps an [`IssueRecord`](crate::milestone::IssueRecord) to the
//! HTML fragment that replaces its placeholder.

mod error;
mod renderer;
mod templates;

pub use error::TemplateError;
pub use renderer::ProgressRenderer;
pub use templates::{FragmentTemplates, COMPLETED_BADGE, INCOMPLETE_BADGE, PROGRESS_BAR, WARNING};

/// Escapes text for use inside an HTML attribute.
///
/// `&` is replaced first so the entities introduced for the other characters
/// are not escaped again.
#[must_use]
pub fn escape_html(unsafe_text: &str) -> String {
    unsafe_text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}
