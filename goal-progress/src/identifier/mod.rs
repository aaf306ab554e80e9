//! Placeholder identifiers.
//!
//! Progress placeholders carry an identifier of the form
//! `milestone:org:repo:issue`, e.g. `2024h2:rust-lang:rust-project-goals:123`.

mod error;

pub use error::IdentifierError;

use std::fmt;
use std::str::FromStr;

/// A parsed `milestone:org:repo:issue` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueIdentifier {
    /// Milestone the issue is tracked under (e.g. "2024h2").
    pub milestone: String,

    /// GitHub organization.
    pub org: String,

    /// GitHub repository name.
    pub repo: String,

    /// Issue number within the repository.
    pub number: u64,
}

impl IssueIdentifier {
    /// Parses an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] if the identifier does not consist of exactly
    /// four non-empty components, if the issue number is not an unsigned
    /// integer, or if the milestone contains anything but ASCII letters, digits,
    /// `-` and `_`.
    pub fn parse(id: &str) -> Result<Self, IdentifierError> {
        let parts: Vec<&str> = id.split(':').collect();
        let [milestone, org, repo, issue] = parts.as_slice() else {
            return Err(IdentifierError::Malformed { id: id.to_string() });
        };

        if [milestone, org, repo, issue].iter().any(|part| part.is_empty()) {
            return Err(IdentifierError::Malformed { id: id.to_string() });
        }

        if !milestone
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(IdentifierError::InvalidMilestone {
                id: id.to_string(),
                milestone: milestone.to_string(),
            });
        }

        let number = issue
            .parse::<u64>()
            .map_err(|_| IdentifierError::InvalidIssueNumber {
                id: id.to_string(),
                issue: issue.to_string(),
            })?;

        Ok(Self {
            milestone: milestone.to_string(),
            org: org.to_string(),
            repo: repo.to_string(),
            number,
        })
    }

    /// Returns the repository in "org/repo" form.
    #[must_use]
    pub fn repository(&self) -> String {
        format!("{}/{}", self.org, self.repo)
    }
}

impl FromStr for IssueIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for IssueIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.milestone, self.org, self.repo, self.number
        )
    }
}
