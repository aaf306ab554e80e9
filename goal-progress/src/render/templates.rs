//! Fragment templates.

use serde::Deserialize;

/// Native progress bar for open issues.
pub const PROGRESS_BAR: &str = r#"<progress value="{{completed}}" max="{{total}}" ></progress>"#;

/// Badge for closed issues whose work is complete.
pub const COMPLETED_BADGE: &str = r#"<center><img src="https://img.shields.io/badge/Completed!%20%3A%29-green" alt="Completed"/></center>"#;

/// Badge for closed issues whose work will never complete.
pub const INCOMPLETE_BADGE: &str = r#"<center><img src="https://img.shields.io/badge/Incomplete%20%3A%28-yellow" alt="Incomplete"/></center>"#;

/// Warning glyph shown when the status pipeline reported an error.
pub const WARNING: &str = r#"<span title="{{message}}" >⚠️</span>"#;

/// Handlebars sources for the four fragment shapes.
///
/// Every template receives `number` and `state`. The progress bar and badges
/// also receive `completed` and `total`; the warning receives `message`.
/// Values are HTML escaped unless a template uses triple braces.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FragmentTemplates {
    pub progress_bar: String,
    pub completed: String,
    pub incomplete: String,
    pub warning: String,
}

impl Default for FragmentTemplates {
    fn default() -> Self {
        Self {
            progress_bar: PROGRESS_BAR.to_string(),
            completed: COMPLETED_BADGE.to_string(),
            incomplete: INCOMPLETE_BADGE.to_string(),
            warning: WARNING.to_string(),
        }
    }
}
