//! Progress renderer.

use super::{escape_html, FragmentTemplates, TemplateError};
use crate::milestone::{IssueRecord, IssueState, Progress};
use handlebars::Handlebars;
use serde_json::{json, Value};

// Registry names of the fragment templates.
const PROGRESS_BAR_NAME: &str = "progress-bar";
const COMPLETED_NAME: &str = "completed";
const INCOMPLETE_NAME: &str = "incomplete";
const WARNING_NAME: &str = "warning";

/// Message shown when an error carries no message of its own.
const DEFAULT_ERROR_MESSAGE: &str = "Error loading status";

/// Renders issue records into progress fragments.
pub struct ProgressRenderer {
    handlebars: Handlebars<'static>,
}

impl ProgressRenderer {
    /// Creates a renderer using the built-in fragments.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in templates; the signature matches
    /// [`ProgressRenderer::with_templates`].
    pub fn new() -> Result<Self, TemplateError> {
        Self::with_templates(&FragmentTemplates::default())
    }

    /// Creates a renderer using custom fragment templates.
    ///
    /// The registry is configured with:
    /// - HTML attribute escaping for every interpolated value
    /// - Strict mode (catches misspelled variables)
    ///
    /// # Errors
    ///
    /// Returns an error if any template fails to compile.
    pub fn with_templates(templates: &FragmentTemplates) -> Result<Self, TemplateError> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(escape_html);
        hbs.set_strict_mode(true);

        hbs.register_template_string(PROGRESS_BAR_NAME, &templates.progress_bar)?;
        hbs.register_template_string(COMPLETED_NAME, &templates.completed)?;
        hbs.register_template_string(INCOMPLETE_NAME, &templates.incomplete)?;
        hbs.register_template_string(WARNING_NAME, &templates.warning)?;

        Ok(Self { handlebars: hbs })
    }

    /// Renders the fragment for one issue.
    ///
    /// # Errors
    ///
    /// Returns an error only if a custom template references a variable that
    /// is not provided.
    pub fn render(&self, issue: &IssueRecord) -> Result<String, TemplateError> {
        match &issue.progress {
            Progress::Tracked { completed, total } => {
                self.progress_element(issue, *completed, *total)
            }
            Progress::Binary {} => match issue.state {
                IssueState::Open => self.progress_element(issue, 0, 1),
                IssueState::Closed => self.progress_element(issue, 1, 1),
            },
            Progress::Error { message } => {
                let message = message
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(DEFAULT_ERROR_MESSAGE);
                let mut data = base_data(issue);
                data["message"] = json!(message);
                self.render_fragment(WARNING_NAME, &data)
            }
        }
    }

    /// A closed issue is either complete or will never complete; an open one
    /// shows a progress bar.
    fn progress_element(
        &self,
        issue: &IssueRecord,
        completed: u64,
        total: u64,
    ) -> Result<String, TemplateError> {
        let mut data = base_data(issue);
        data["completed"] = json!(completed);
        data["total"] = json!(total);

        let name = match issue.state {
            IssueState::Closed if completed == total => COMPLETED_NAME,
            IssueState::Closed => INCOMPLETE_NAME,
            IssueState::Open => PROGRESS_BAR_NAME,
        };
        self.render_fragment(name, &data)
    }

    fn render_fragment(&self, name: &str, data: &Value) -> Result<String, TemplateError> {
        Ok(self.handlebars.render(name, data)?)
    }
}

fn base_data(issue: &IssueRecord) -> Value {
    json!({
        "number": issue.number,
        "state": issue.state.as_str(),
    })
}
