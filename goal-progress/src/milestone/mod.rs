//! Milestone status documents.
//!
//! Each milestone is published as `/api/{milestone}.json`:
//!
//! ```json
//! {
//!   "repository": "rust-lang/rust-project-goals",
//!   "issues": [
//!     { "number": 123, "state": "OPEN",
//!       "progress": { "Tracked": { "completed": 2, "total": 5 } } }
//!   ]
//! }
//! ```
//!
//! Fields not modelled here (titles, owners, ...) are ignored.

use crate::identifier::IssueIdentifier;
use crate::loader::LoadError;
use serde::Deserialize;

/// Parsed status data for one milestone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MilestoneDocument {
    /// Repository the issues live in, as "org/repo".
    pub repository: String,

    /// Tracked issues in document order.
    pub issues: Vec<IssueRecord>,
}

/// One tracked issue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueRecord {
    /// Issue number.
    pub number: u64,

    /// Whether the issue is open or closed.
    pub state: IssueState,

    /// Progress of the work tracked by the issue.
    pub progress: Progress,
}

/// GitHub issue state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    /// Returns the state as spelled in milestone data.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }
}

/// Progress of a tracked issue.
///
/// Encoded externally tagged, so exactly one of `Tracked`, `Binary` or `Error`
/// must be present. Anything else fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum Progress {
    /// Sub-task counting.
    Tracked { completed: u64, total: u64 },

    /// A yes/no issue without sub-tasks.
    Binary {},

    /// The status pipeline could not determine progress.
    Error {
        #[serde(default)]
        message: Option<String>,
    },
}

impl MilestoneDocument {
    /// Parses a document from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if the text is not a valid document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Looks up the issue named by `id`.
    ///
    /// Returns `Ok(None)` when no issue has the requested number; the first
    /// matching record wins.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Mismatch`] if the document belongs to another
    /// repository than the one `id` names.
    pub fn find_issue(&self, id: &IssueIdentifier) -> Result<Option<&IssueRecord>, LoadError> {
        let expected = id.repository();
        if self.repository != expected {
            return Err(LoadError::Mismatch {
                expected,
                found: self.repository.clone(),
            });
        }

        Ok(self.issues.iter().find(|issue| issue.number == id.number))
    }
}
