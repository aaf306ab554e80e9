//! Orchestrates page updates from a configuration.

mod error;

pub use error::RunnerError;

use crate::config::{DataLocation, ProgressConfig};
use crate::loader::{DataLoader, FileSource, HttpSource, LoadError, MilestoneSource};
use crate::milestone::MilestoneDocument;
use crate::page::{update_page, PageUpdate};
use crate::render::ProgressRenderer;
use crate::summary::PageSummary;
use std::path::Path;
use tracing::info;

/// The milestone source selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    /// Documents fetched over HTTP.
    Http(HttpSource),
    /// Documents read from disk.
    File(FileSource),
}

impl MilestoneSource for ConfiguredSource {
    async fn fetch(&self, milestone: &str) -> Result<MilestoneDocument, LoadError> {
        match self {
            Self::Http(source) => source.fetch(milestone).await,
            Self::File(source) => source.fetch(milestone).await,
        }
    }
}

/// Owns the loader and renderer shared by every page of a run.
///
/// Milestone documents are cached for the lifetime of the runner, so pages
/// processed by the same runner fetch each milestone once.
pub struct Runner {
    config: ProgressConfig,
    loader: DataLoader<ConfiguredSource>,
    renderer: ProgressRenderer,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the HTTP client
    /// cannot be built, or a fragment template fails to compile.
    pub fn new(config: ProgressConfig) -> Result<Self, RunnerError> {
        config.validate()?;
        let source = match config.data_location()? {
            DataLocation::Remote(base_url) => {
                info!(%base_url, "Loading milestone data over HTTP");
                ConfiguredSource::Http(HttpSource::new(
                    base_url,
                    config.timeout(),
                    &config.user_agent,
                )?)
            }
            DataLocation::Local(dir) => {
                info!(dir = %dir.display(), "Loading milestone data from disk");
                ConfiguredSource::File(FileSource::new(dir))
            }
        };
        let renderer = ProgressRenderer::with_templates(&config.templates)?;

        Ok(Self {
            config,
            loader: DataLoader::new(source),
            renderer,
        })
    }

    /// Returns the configuration the runner was built from.
    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }

    /// Returns the loader, e.g. to inspect its cache.
    pub fn loader(&self) -> &DataLoader<ConfiguredSource> {
        &self.loader
    }

    /// Updates every placeholder in `html`.
    pub async fn render_page(&self, html: &str) -> PageUpdate {
        update_page(html, &self.loader, &self.renderer, self.config.concurrency).await
    }

    /// Updates the page at `input` and writes the result to `output`.
    ///
    /// `input` and `output` may be the same file.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Io`] if the page can't be read or written.
    /// Placeholder failures are reported in the summary instead.
    pub async fn update_file(&self, input: &Path, output: &Path) -> Result<PageSummary, RunnerError> {
        let html = self.read_page(input).await?;
        let update = self.render_page(&html).await;

        tokio::fs::write(output, update.html)
            .await
            .map_err(|source| RunnerError::Io {
                path: output.display().to_string(),
                source,
            })?;
        info!(
            input = %input.display(),
            output = %output.display(),
            rendered = update.summary.rendered,
            "Wrote page"
        );

        Ok(update.summary)
    }

    /// Reads a page from disk.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Io`] if the file can't be read.
    pub async fn read_page(&self, path: &Path) -> Result<String, RunnerError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| RunnerError::Io {
                path: path.display().to_string(),
                source,
            })
    }

    /// Renders the fragment for a single identifier.
    ///
    /// Returns `Ok(None)` if the milestone has no such issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the issue cannot be loaded or rendered.
    pub async fn render_issue(&self, id: &str) -> Result<Option<String>, RunnerError> {
        match self.loader.load_issue(id).await? {
            Some(issue) => Ok(Some(self.renderer.render(&issue)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use std::fs;
    use tempfile::TempDir;

    fn local_config(dir: &Path) -> ProgressConfig {
        ProgressConfig {
            api_dir: Some(dir.to_path_buf()),
            ..ProgressConfig::default()
        }
    }

    #[test]
    fn runner_requires_a_data_location() {
        let result = Runner::new(ProgressConfig::default());
        assert!(matches!(
            result,
            Err(RunnerError::Config(ConfigError::ValidationError { .. }))
        ));
    }

    #[test]
    fn runner_selects_http_source_for_base_url() {
        let config = ProgressConfig {
            base_url: Some("https://rust-lang.github.io/rust-project-goals/".to_string()),
            ..ProgressConfig::default()
        };
        let runner = Runner::new(config).unwrap();

        assert!(matches!(
            runner.loader().source(),
            ConfiguredSource::Http(_)
        ));
    }

    #[tokio::test]
    async fn can_render_issue_from_disk() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("2024h2.json"),
            r#"{ "repository": "rust-lang/rust-project-goals", "issues": [
                { "number": 7, "state": "OPEN", "progress": { "Binary": {} } } ] }"#,
        )
        .unwrap();
        let runner = Runner::new(local_config(temp.path())).unwrap();

        let fragment = runner
            .render_issue("2024h2:rust-lang:rust-project-goals:7")
            .await
            .unwrap();
        assert_eq!(
            fragment.as_deref(),
            Some(r#"<progress value="0" max="1" ></progress>"#)
        );

        let missing = runner
            .render_issue("2024h2:rust-lang:rust-project-goals:8")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn update_file_rewrites_in_place() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("2024h2.json"),
            r#"{ "repository": "rust-lang/rust-project-goals", "issues": [
                { "number": 7, "state": "OPEN",
                  "progress": { "Tracked": { "completed": 1, "total": 2 } } } ] }"#,
        )
        .unwrap();
        let page = temp.path().join("goals.html");
        fs::write(
            &page,
            r#"<div class="tracking-issue-progress" id="2024h2:rust-lang:rust-project-goals:7"></div>"#,
        )
        .unwrap();
        let runner = Runner::new(local_config(temp.path())).unwrap();

        let summary = runner.update_file(&page, &page).await.unwrap();

        assert_eq!(summary.rendered, 1);
        assert_eq!(
            fs::read_to_string(&page).unwrap(),
            r#"<div class="tracking-issue-progress" id="2024h2:rust-lang:rust-project-goals:7"><progress value="1" max="2" ></progress></div>"#
        );
    }

    #[tokio::test]
    async fn missing_page_is_io_error() {
        let temp = TempDir::new().unwrap();
        let runner = Runner::new(local_config(temp.path())).unwrap();

        let result = runner
            .update_file(&temp.path().join("missing.html"), &temp.path().join("out.html"))
            .await;
        assert!(matches!(result, Err(RunnerError::Io { .. })));
    }
}
