//! Where milestone documents come from.

use super::LoadError;
use crate::milestone::MilestoneDocument;
use reqwest::Client;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// A source of milestone documents.
///
/// Implementations perform the fetch only; caching is the job of
/// [`DataLoader`](super::DataLoader).
pub trait MilestoneSource: Send + Sync {
    /// Fetches and parses the document for `milestone`.
    fn fetch(
        &self,
        milestone: &str,
    ) -> impl Future<Output = Result<MilestoneDocument, LoadError>> + Send;
}

/// Fetches `{base_url}/api/{milestone}.json` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: Url,
}

impl HttpSource {
    /// Creates a source rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: Url, timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates a source using an existing client.
    #[must_use]
    pub fn with_client(client: Client, mut base_url: Url) -> Self {
        // Without the trailing slash `join` would replace the last segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    /// Returns the URL the document for `milestone` is fetched from.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] if the milestone does not form a valid path.
    pub fn milestone_url(&self, milestone: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(&format!("api/{milestone}.json"))
    }
}

impl MilestoneSource for HttpSource {
    async fn fetch(&self, milestone: &str) -> Result<MilestoneDocument, LoadError> {
        let url = self
            .milestone_url(milestone)
            .map_err(|source| LoadError::InvalidUrl {
                milestone: milestone.to_string(),
                source,
            })?;
        debug!(%url, "Fetching milestone data");

        let transport = |source: reqwest::Error| LoadError::Transport {
            url: url.to_string(),
            source: Arc::new(source),
        };
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Network {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(transport)?;
        MilestoneDocument::from_json(&text).map_err(|source| LoadError::Parse {
            origin: url.to_string(),
            source: Arc::new(source),
        })
    }
}

/// Reads `{dir}/{milestone}.json` from disk, e.g. the `api/` directory of a built book.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    /// Creates a source reading from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory documents are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl MilestoneSource for FileSource {
    async fn fetch(&self, milestone: &str) -> Result<MilestoneDocument, LoadError> {
        let path = self.dir.join(format!("{milestone}.json"));
        debug!(path = %path.display(), "Reading milestone data");

        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.display().to_string(),
                source: Arc::new(source),
            })?;

        MilestoneDocument::from_json(&text).map_err(|source| LoadError::Parse {
            origin: path.display().to_string(),
            source: Arc::new(source),
        })
    }
}
