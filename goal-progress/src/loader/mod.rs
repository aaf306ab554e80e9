//! Loading and caching of milestone documents.
//!
//! [`DataLoader`] resolves placeholder identifiers to issue records. Each
//! milestone document is fetched at most once per loader and kept for the
//! loader's lifetime. Concurrent lookups of the same uncached milestone share
//! a single fetch.

mod error;
mod source;

pub use error::LoadError;
pub use source::{FileSource, HttpSource, MilestoneSource};

use crate::identifier::IssueIdentifier;
use crate::milestone::{IssueRecord, MilestoneDocument};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

/// Outcome of one fetch, shared by every lookup that overlaps it.
type FetchSlot = OnceCell<Result<Arc<MilestoneDocument>, LoadError>>;

/// Resolves identifiers to issue records, caching milestone documents.
pub struct DataLoader<S> {
    source: S,
    cache: Mutex<HashMap<String, Arc<MilestoneDocument>>>,
    in_flight: Mutex<HashMap<String, Arc<FetchSlot>>>,
}

impl<S: MilestoneSource> DataLoader<S> {
    /// Creates a loader with an empty cache.
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolves an identifier string such as `2024h2:rust-lang:rust-project-goals:123`.
    ///
    /// Returns `Ok(None)` if the milestone has no issue with that number.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the identifier is malformed, the milestone
    /// document cannot be loaded, or it belongs to a different repository.
    pub async fn load_issue(&self, id: &str) -> Result<Option<IssueRecord>, LoadError> {
        let id = IssueIdentifier::parse(id)?;
        self.load(&id).await
    }

    /// Resolves an already parsed identifier.
    ///
    /// # Errors
    ///
    /// See [`DataLoader::load_issue`].
    pub async fn load(&self, id: &IssueIdentifier) -> Result<Option<IssueRecord>, LoadError> {
        let document = self.milestone(&id.milestone).await?;
        let issue = document.find_issue(id)?.cloned();
        if issue.is_none() {
            debug!(%id, "Issue not found in milestone data");
        }
        Ok(issue)
    }

    /// Returns the document for `milestone`, fetching it on first use.
    ///
    /// Lookups that overlap an in-flight fetch wait for it and receive its
    /// result, success or failure.
    ///
    /// # Errors
    ///
    /// Returns the source's [`LoadError`] if the fetch fails. Failures are not
    /// cached, so a later call fetches again.
    pub async fn milestone(&self, milestone: &str) -> Result<Arc<MilestoneDocument>, LoadError> {
        if let Some(document) = self.cached(milestone).await {
            return Ok(document);
        }

        let slot = {
            let mut in_flight = self.in_flight.lock().await;
            Arc::clone(
                in_flight
                    .entry(milestone.to_string())
                    .or_insert_with(|| Arc::new(OnceCell::new())),
            )
        };

        let result = slot
            .get_or_init(|| self.fetch_and_cache(milestone))
            .await
            .clone();

        // Only the slot we waited on is retired; a newer one belongs to a later fetch.
        let mut in_flight = self.in_flight.lock().await;
        if in_flight
            .get(milestone)
            .is_some_and(|current| Arc::ptr_eq(current, &slot))
        {
            in_flight.remove(milestone);
        }

        result
    }

    async fn fetch_and_cache(
        &self,
        milestone: &str,
    ) -> Result<Arc<MilestoneDocument>, LoadError> {
        let document = match self.source.fetch(milestone).await {
            Ok(document) => Arc::new(document),
            Err(e) => {
                warn!(milestone, error = %e, "Failed to load milestone data");
                return Err(e);
            }
        };

        info!(
            milestone,
            repository = %document.repository,
            issues = document.issues.len(),
            "Loaded milestone data"
        );
        self.cache
            .lock()
            .await
            .insert(milestone.to_string(), Arc::clone(&document));

        Ok(document)
    }

    /// Returns the names of all cached milestones, sorted.
    pub async fn cached_milestones(&self) -> Vec<String> {
        let mut milestones: Vec<String> = self.cache.lock().await.keys().cloned().collect();
        milestones.sort();
        milestones
    }

    async fn cached(&self, milestone: &str) -> Option<Arc<MilestoneDocument>> {
        self.cache.lock().await.get(milestone).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::IdentifierError;
    use crate::milestone::{IssueState, Progress};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const GOALS_2024H2: &str = r#"{
        "repository": "rust-lang/rust-project-goals",
        "issues": [
            { "number": 123, "state": "OPEN",
              "progress": { "Tracked": { "completed": 2, "total": 5 } } },
            { "number": 124, "state": "CLOSED", "progress": { "Binary": {} } }
        ]
    }"#;

    /// Serves documents from memory and counts fetches.
    struct StaticSource {
        documents: HashMap<&'static str, &'static str>,
        fetches: AtomicUsize,
        delay: Duration,
    }

    impl StaticSource {
        fn new(documents: &[(&'static str, &'static str)]) -> Self {
            Self {
                documents: documents.iter().copied().collect(),
                fetches: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl MilestoneSource for StaticSource {
        async fn fetch(&self, milestone: &str) -> Result<MilestoneDocument, LoadError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let Some(text) = self.documents.get(milestone) else {
                return Err(LoadError::Network {
                    url: format!("/api/{milestone}.json"),
                    status: 404,
                });
            };
            MilestoneDocument::from_json(text).map_err(|source| LoadError::Parse {
                origin: milestone.to_string(),
                source: Arc::new(source),
            })
        }
    }

    #[tokio::test]
    async fn can_load_issue() {
        let loader = DataLoader::new(StaticSource::new(&[("2024h2", GOALS_2024H2)]));

        let issue = loader
            .load_issue("2024h2:rust-lang:rust-project-goals:123")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(issue.number, 123);
        assert_eq!(issue.state, IssueState::Open);
        assert_eq!(
            issue.progress,
            Progress::Tracked {
                completed: 2,
                total: 5
            }
        );
    }

    #[tokio::test]
    async fn malformed_identifier_fails_without_fetching() {
        let loader = DataLoader::new(StaticSource::new(&[("2024h2", GOALS_2024H2)]));

        let result = loader.load_issue("2024h2:rust-lang:123").await;

        assert!(matches!(
            result,
            Err(LoadError::Format(IdentifierError::Malformed { .. }))
        ));
        assert_eq!(loader.source().fetches(), 0);
    }

    #[tokio::test]
    async fn absent_issue_is_not_found() {
        let loader = DataLoader::new(StaticSource::new(&[("2024h2", GOALS_2024H2)]));

        let issue = loader
            .load_issue("2024h2:rust-lang:rust-project-goals:999")
            .await
            .unwrap();

        assert!(issue.is_none());
    }

    #[tokio::test]
    async fn repository_mismatch_fails() {
        let loader = DataLoader::new(StaticSource::new(&[("2024h2", GOALS_2024H2)]));

        let result = loader.load_issue("2024h2:rust-lang:rust:123").await;

        assert!(matches!(result, Err(LoadError::Mismatch { .. })));
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let loader = DataLoader::new(StaticSource::new(&[("2024h2", GOALS_2024H2)]));

        loader
            .load_issue("2024h2:rust-lang:rust-project-goals:123")
            .await
            .unwrap();
        loader
            .load_issue("2024h2:rust-lang:rust-project-goals:124")
            .await
            .unwrap();

        assert_eq!(loader.source().fetches(), 1);
        assert_eq!(loader.cached_milestones().await, vec!["2024h2".to_string()]);
    }

    #[tokio::test]
    async fn concurrent_lookups_share_one_fetch() {
        let mut source = StaticSource::new(&[("2024h2", GOALS_2024H2)]);
        source.delay = Duration::from_millis(20);
        let loader = DataLoader::new(source);

        let (a, b) = tokio::join!(
            loader.load_issue("2024h2:rust-lang:rust-project-goals:123"),
            loader.load_issue("2024h2:rust-lang:rust-project-goals:124"),
        );

        assert!(a.unwrap().is_some());
        assert!(b.unwrap().is_some());
        assert_eq!(loader.source().fetches(), 1);
    }

    #[tokio::test]
    async fn concurrent_lookups_share_one_failure() {
        let mut source = StaticSource::new(&[]);
        source.delay = Duration::from_millis(100);
        let loader = DataLoader::new(source);

        let ids: Vec<String> = (1..=4).map(|n| format!("2024h2:a:b:{n}")).collect();
        let started = std::time::Instant::now();
        let results =
            futures::future::join_all(ids.iter().map(|id| loader.load_issue(id))).await;

        for result in results {
            assert!(matches!(
                result,
                Err(LoadError::Network { status: 404, .. })
            ));
        }
        assert_eq!(loader.source().fetches(), 1);
        assert!(started.elapsed() < Duration::from_millis(300));

        // A later, non-overlapping lookup tries again.
        let result = loader.load_issue("2024h2:a:b:1").await;
        assert!(result.is_err());
        assert_eq!(loader.source().fetches(), 2);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let loader = DataLoader::new(StaticSource::new(&[]));

        for _ in 0..2 {
            let result = loader
                .load_issue("2025h1:rust-lang:rust-project-goals:1")
                .await;
            assert!(matches!(
                result,
                Err(LoadError::Network { status: 404, .. })
            ));
        }

        assert_eq!(loader.source().fetches(), 2);
        assert!(loader.cached_milestones().await.is_empty());
    }
}
