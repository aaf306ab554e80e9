//! Runner error types.

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// HTTP client initialization errors.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// Fragment template errors.
    #[error(transparent)]
    Template(#[from] crate::render::TemplateError),

    /// Errors resolving a single identifier.
    #[error(transparent)]
    Load(#[from] crate::loader::LoadError),

    /// Failed to read or write a page.
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
