//! Identifier parsing error types.

use thiserror::Error;

/// Errors produced while parsing a placeholder identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The identifier is not four non-empty colon separated components.
    #[error("id `{id}` does not have the expected format: milestone:org:repo:issue")]
    Malformed { id: String },

    /// The issue component is not an unsigned integer.
    #[error("id `{id}` has a non-numeric issue number `{issue}`")]
    InvalidIssueNumber { id: String, issue: String },

    /// The milestone contains characters other than ASCII letters, digits, `-` and `_`.
    #[error("id `{id}` names milestone `{milestone}` which is not a valid milestone name")]
    InvalidMilestone { id: String, milestone: String },
}
