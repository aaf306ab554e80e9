//! Data loading error types.

use crate::identifier::IdentifierError;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while resolving an identifier to an issue.
///
/// Cloneable so one failed fetch can be handed to every lookup waiting on it.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// The identifier is malformed.
    #[error(transparent)]
    Format(#[from] IdentifierError),

    /// The milestone document request returned a non-success status.
    #[error("HTTP error loading '{url}': status {status}")]
    Network { url: String, status: u16 },

    /// The milestone does not form a valid document URL.
    #[error("Cannot build a URL for milestone '{milestone}': {source}")]
    InvalidUrl {
        milestone: String,
        #[source]
        source: url::ParseError,
    },

    /// The milestone document request could not be performed.
    #[error("Failed to request '{url}': {source}")]
    Transport {
        url: String,
        #[source]
        source: Arc<reqwest::Error>,
    },

    /// Failed to read a milestone document from disk.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The milestone document is not valid JSON or has an unexpected shape.
    #[error("Failed to parse milestone data from '{origin}': {source}")]
    Parse {
        origin: String,
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// The milestone document belongs to a different repository.
    #[error("expected repository {expected} but found {found}")]
    Mismatch { expected: String, found: String },
}
