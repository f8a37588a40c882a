//! Shared cache of vocabulary terms
//!
//! The index is read synchronously while the user types and written only by
//! background loads. One coarse lock guards the cache; a second set remembers
//! namespaces whose load is in flight so repeated requests are not duplicated.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use super::builtin;
use super::source::{
    BundledSources, BundledVocabularies, DirectoryVocabularies, EmbeddedVocabularies,
    HttpVocabularyFetcher, VocabularyFetcher, parse_triples,
};
use super::term::{NamespaceTerm, extract_terms};
use crate::config::VocabularyConfig;
use crate::error::{Result, VocabularyError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Namespace URI → terms cache with non-blocking population
pub struct TermIndex {
    /// Loaded namespaces (an empty list means "loaded, nothing found")
    terms: Mutex<HashMap<String, Vec<NamespaceTerm>>>,
    /// Namespaces whose load has been started but not finished
    pending: Mutex<HashSet<String>>,
    /// Network retrieval, absent when running offline
    fetcher: Option<Arc<dyn VocabularyFetcher>>,
    /// Local copies keyed by well-known prefix
    bundled: Arc<dyn BundledVocabularies>,
}

impl TermIndex {
    /// Create an index over the given sources
    pub fn new(
        fetcher: Option<Arc<dyn VocabularyFetcher>>,
        bundled: Arc<dyn BundledVocabularies>,
    ) -> Self {
        Self {
            terms: Mutex::new(HashMap::new()),
            pending: Mutex::new(HashSet::new()),
            fetcher,
            bundled,
        }
    }

    /// Index that only consults the vocabularies compiled into the binary
    pub fn offline() -> Self {
        Self::new(None, Arc::new(EmbeddedVocabularies))
    }

    /// Index configured from the `[vocabulary]` settings
    pub fn from_config(config: &VocabularyConfig) -> Result<Self> {
        let fetcher: Option<Arc<dyn VocabularyFetcher>> = if config.online {
            Some(Arc::new(HttpVocabularyFetcher::new(Duration::from_secs(
                config.timeout,
            ))?))
        } else {
            None
        };

        let mut bundled = BundledSources::new();
        if let Some(directory) = &config.bundled_directory {
            bundled = bundled.with(Arc::new(DirectoryVocabularies::new(directory)));
        }
        bundled = bundled.with(Arc::new(EmbeddedVocabularies));

        Ok(Self::new(fetcher, Arc::new(bundled)))
    }

    /// Cached terms of a namespace; empty when not loaded yet
    pub fn terms(&self, namespace_uri: &str) -> Vec<NamespaceTerm> {
        lock(&self.terms)
            .get(namespace_uri)
            .cloned()
            .unwrap_or_default()
    }

    /// Check whether a namespace has been loaded
    pub fn is_loaded(&self, namespace_uri: &str) -> bool {
        lock(&self.terms).contains_key(namespace_uri)
    }

    /// Check whether a load of the namespace is in flight
    pub fn is_pending(&self, namespace_uri: &str) -> bool {
        lock(&self.pending).contains(namespace_uri)
    }

    /// Store terms directly, replacing anything cached for the namespace
    pub fn insert(&self, namespace_uri: &str, terms: Vec<NamespaceTerm>) {
        lock(&self.terms).insert(namespace_uri.to_string(), terms);
    }

    /// Number of loaded namespaces
    pub fn len(&self) -> usize {
        lock(&self.terms).len()
    }

    /// Check whether nothing has been loaded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load the terms of a namespace, returning the cached list when present
    ///
    /// Retrieval and parse failures are logged and degrade to the bundled copy,
    /// then to an empty list; this never fails.
    pub async fn load_terms(&self, namespace_uri: &str) -> Vec<NamespaceTerm> {
        let cached = lock(&self.terms).get(namespace_uri).cloned();
        if let Some(cached) = cached {
            lock(&self.pending).remove(namespace_uri);
            return cached;
        }

        let mut terms = match self.fetch_terms(namespace_uri).await {
            Ok(terms) => terms,
            Err(e) => {
                warn!("{}", e);
                Vec::new()
            }
        };

        if terms.is_empty() {
            match self.bundled_terms(namespace_uri) {
                Ok(bundled) => terms = bundled,
                Err(e) => debug!("{}", e),
            }
        }

        info!("Loaded {} terms for <{}>", terms.len(), namespace_uri);
        let stored = {
            let mut cache = lock(&self.terms);
            cache
                .entry(namespace_uri.to_string())
                .or_insert(terms)
                .clone()
        };
        lock(&self.pending).remove(namespace_uri);
        stored
    }

    /// Start loading a namespace in the background
    ///
    /// Returns `true` when a load was spawned. Requests for namespaces that are
    /// loaded or already loading are ignored, as are requests made outside of
    /// a tokio runtime.
    pub fn request(self: &Arc<Self>, namespace_uri: &str) -> bool {
        if self.is_loaded(namespace_uri) {
            return false;
        }

        let Ok(handle) = Handle::try_current() else {
            debug!("No runtime available to load <{}>", namespace_uri);
            return false;
        };

        if !lock(&self.pending).insert(namespace_uri.to_string()) {
            return false;
        }

        let index = Arc::clone(self);
        let namespace_uri = namespace_uri.to_string();
        handle.spawn(async move {
            index.load_terms(&namespace_uri).await;
        });
        true
    }

    async fn fetch_terms(&self, namespace_uri: &str) -> Result<Vec<NamespaceTerm>> {
        let Some(fetcher) = &self.fetcher else {
            return Ok(Vec::new());
        };
        let triples = fetcher.fetch(namespace_uri).await?;
        Ok(extract_terms(namespace_uri, &triples))
    }

    fn bundled_terms(&self, namespace_uri: &str) -> Result<Vec<NamespaceTerm>> {
        let prefix = builtin::by_namespace(namespace_uri)
            .map(|v| v.prefix)
            .ok_or_else(|| VocabularyError::NotBundled(namespace_uri.to_string()))?;
        let bundle = self
            .bundled
            .lookup(prefix)
            .ok_or_else(|| VocabularyError::NotBundled(prefix.to_string()))?;
        let triples = parse_triples(&bundle.data, bundle.format, namespace_uri)?;
        Ok(extract_terms(namespace_uri, &triples))
    }
}

impl Default for TermIndex {
    fn default() -> Self {
        Self::offline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use oxrdf::Triple;
    use oxrdfio::RdfFormat;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const EX: &str = "http://example.org/voc#";
    const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";

    struct StaticFetcher {
        data: &'static str,
        calls: AtomicUsize,
    }

    impl StaticFetcher {
        fn new(data: &'static str) -> Self {
            Self {
                data,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VocabularyFetcher for StaticFetcher {
        async fn fetch(&self, namespace_uri: &str) -> Result<Vec<Triple>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            parse_triples(self.data.as_bytes(), RdfFormat::Turtle, namespace_uri)
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl VocabularyFetcher for FailingFetcher {
        async fn fetch(&self, namespace_uri: &str) -> Result<Vec<Triple>> {
            Err(VocabularyError::Fetch {
                uri: namespace_uri.to_string(),
                message: "offline".to_string(),
            }
            .into())
        }
    }

    const EX_VOCAB: &str = r#"
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        @prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
        <http://example.org/voc#Person> a rdfs:Class ; rdfs:label "Person" .
        <http://example.org/voc#knows> a rdf:Property .
    "#;

    #[tokio::test]
    async fn test_load_terms_from_fetcher() {
        let fetcher = Arc::new(StaticFetcher::new(EX_VOCAB));
        let index = TermIndex::new(Some(fetcher.clone()), Arc::new(EmbeddedVocabularies));

        let terms = index.load_terms(EX).await;
        let names: Vec<&str> = terms.iter().map(|t| t.local_name.as_str()).collect();
        assert_eq!(names, vec!["Person", "knows"]);
        assert_eq!(index.terms(EX).len(), 2);
    }

    #[tokio::test]
    async fn test_load_terms_is_idempotent() {
        let fetcher = Arc::new(StaticFetcher::new(EX_VOCAB));
        let index = TermIndex::new(Some(fetcher.clone()), Arc::new(EmbeddedVocabularies));

        index.load_terms(EX).await;
        index.load_terms(EX).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_falls_back_to_bundle() {
        let index = TermIndex::new(Some(Arc::new(FailingFetcher)), Arc::new(EmbeddedVocabularies));

        let terms = index.load_terms(RDFS).await;
        assert!(terms.iter().any(|t| t.local_name == "subClassOf"));
        assert!(terms.iter().any(|t| t.local_name == "Class"));
    }

    #[tokio::test]
    async fn test_unknown_namespace_degrades_to_empty() {
        let index = TermIndex::new(Some(Arc::new(FailingFetcher)), Arc::new(EmbeddedVocabularies));

        assert!(index.load_terms(EX).await.is_empty());
        assert!(index.is_loaded(EX));
    }

    #[test]
    fn test_terms_empty_before_load() {
        let index = TermIndex::offline();
        assert!(index.terms(RDFS).is_empty());
        assert!(!index.is_loaded(RDFS));
    }

    #[test]
    fn test_offline_index_serves_embedded_terms() {
        let index = TermIndex::offline();
        let terms = tokio_test::block_on(index.load_terms(RDFS));
        assert!(terms.iter().any(|t| t.local_name == "label"));
        assert!(index.is_loaded(RDFS));
    }

    #[test]
    fn test_cached_load_clears_pending() {
        let index = TermIndex::offline();
        index.insert(EX, vec![NamespaceTerm::new(EX, "Person", None)]);
        // A request that lost the race with a finished load
        lock(&index.pending).insert(EX.to_string());

        let terms = tokio_test::block_on(index.load_terms(EX));
        assert_eq!(terms.len(), 1);
        assert!(!index.is_pending(EX));
    }

    #[test]
    fn test_request_without_runtime_is_ignored() {
        let index = Arc::new(TermIndex::offline());
        assert!(!index.request(RDFS));
        assert!(!index.is_pending(RDFS));
    }

    #[tokio::test]
    async fn test_request_loads_in_background_once() {
        let fetcher = Arc::new(StaticFetcher::new(EX_VOCAB));
        let index = Arc::new(TermIndex::new(
            Some(fetcher.clone()),
            Arc::new(EmbeddedVocabularies),
        ));

        assert!(index.request(EX));
        assert!(!index.request(EX));

        for _ in 0..100 {
            if index.is_loaded(EX) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(index.terms(EX).len(), 2);
        assert!(!index.is_pending(EX));
        assert!(!index.request(EX));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }
}
