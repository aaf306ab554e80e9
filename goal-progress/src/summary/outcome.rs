//! Placeholder outcome types.

/// Result of processing a single placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderOutcome {
    /// The placeholder content was replaced.
    Rendered {
        /// Placeholder identifier.
        id: String,
    },

    /// The milestone has no issue with the requested number.
    NotFound {
        /// Placeholder identifier.
        id: String,
    },

    /// The placeholder could not be processed at all.
    Skipped {
        /// Reason for skipping.
        reason: String,
    },

    /// Loading or rendering failed.
    Failed {
        /// Placeholder identifier.
        id: String,
        /// Error message.
        error: String,
    },
}
