//! Configuration loading.
//!
//! Configuration comes from an optional TOML file; command line flags are
//! applied on top by the CLI.
//!
//! ```toml
//! base-url = "https://rust-lang.github.io/rust-project-goals/"
//! timeout-secs = 30
//! concurrency = 8
//!
//! [templates]
//! warning = '<span class="warning" title="{{message}}">!</span>'
//! ```

mod error;

pub use error::ConfigError;

use crate::page::DEFAULT_CONCURRENCY;
use crate::render::FragmentTemplates;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Origin reported for configuration that did not come from a file.
const COMMAND_LINE: &str = "<command line>";

/// Settings for loading milestone data and rendering fragments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ProgressConfig {
    /// Site root serving `api/{milestone}.json`.
    pub base_url: Option<String>,

    /// Directory containing `{milestone}.json` files. Takes precedence over `base-url`.
    pub api_dir: Option<PathBuf>,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum placeholders resolved at once.
    pub concurrency: usize,

    /// User agent sent with HTTP requests.
    pub user_agent: String,

    /// Fragment template overrides.
    pub templates: FragmentTemplates,

    /// File the configuration was loaded from.
    #[serde(skip)]
    pub origin: Option<PathBuf>,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_dir: None,
            timeout_secs: 30,
            concurrency: DEFAULT_CONCURRENCY,
            user_agent: default_user_agent(),
            templates: FragmentTemplates::default(),
            origin: None,
        }
    }
}

pub(crate) fn default_user_agent() -> String {
    format!("goal-progress/{}", env!("CARGO_PKG_VERSION"))
}

/// Where milestone documents are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    /// Fetched over HTTP below this site root.
    Remote(Url),

    /// Read from this directory.
    Local(PathBuf),
}

impl ProgressConfig {
    /// Loads a configuration file.
    ///
    /// A relative `api-dir` is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file can't be read, isn't valid TOML, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading config");

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;

        if let Some(api_dir) = config.api_dir.take() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.api_dir = Some(base.join(api_dir));
        }
        config.origin = Some(path.to_path_buf());

        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges and the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(self.invalid("concurrency must be at least 1"));
        }
        if self.timeout_secs == 0 {
            return Err(self.invalid("timeout-secs must be at least 1"));
        }
        if let Some(base_url) = &self.base_url {
            self.parse_base_url(base_url)?;
        }
        Ok(())
    }

    /// Returns where milestone documents should be read from.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if neither `api-dir` nor
    /// `base-url` is set, or the base URL is invalid.
    pub fn data_location(&self) -> Result<DataLocation, ConfigError> {
        if let Some(api_dir) = &self.api_dir {
            return Ok(DataLocation::Local(api_dir.clone()));
        }
        match &self.base_url {
            Some(base_url) => Ok(DataLocation::Remote(self.parse_base_url(base_url)?)),
            None => Err(self.invalid("one of base-url or api-dir must be set")),
        }
    }

    /// Points the configuration at a site root.
    ///
    /// Any `api-dir` is cleared, since it would otherwise take precedence.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self.api_dir = None;
        self
    }

    /// Points the configuration at a local directory of milestone documents.
    #[must_use]
    pub fn with_api_dir(mut self, api_dir: impl Into<PathBuf>) -> Self {
        self.api_dir = Some(api_dir.into());
        self
    }

    /// Returns the HTTP request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn parse_base_url(&self, base_url: &str) -> Result<Url, ConfigError> {
        let url = Url::parse(base_url)
            .map_err(|e| self.invalid(&format!("invalid base-url '{base_url}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(self.invalid(&format!(
                "base-url '{base_url}' must use http or https"
            )));
        }
        Ok(url)
    }

    fn invalid(&self, message: &str) -> ConfigError {
        ConfigError::ValidationError {
            path: self
                .origin
                .as_ref()
                .map_or_else(|| COMMAND_LINE.to_string(), |p| p.display().to_string()),
            message: message.to_string(),
        }
    }
}
