//! Name → dataset store, lazily filled from static JSON resources.
//!
//! Lifecycle
//! ---------
//! - Created with the built-in `basics_dict` summary.
//! - A miss fetches `assets/<name>.json` once, parses it and keeps it.
//! - [`DataCache::replace`] swaps the whole content (new upload, new filter).
//!   There is no partial invalidation and no eviction.
//!
//! Two `get` calls racing on the same missing name both fetch; the later
//! insert wins. Both parse the same resource so the outcome is identical.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use super::dataset::{CacheEntry, DataError, Dataset, ScalarDict, BASICS_KEY};

/// Summary scalars bundled with the app for the demo data set.
const BUILTIN_BASICS: &str = include_str!("../../assets/basics_dict.json");

/// Source of named JSON resources.
pub trait ResourceFetcher {
    fn fetch<'a>(&'a self, name: &'a str) -> LocalBoxFuture<'a, Result<String, DataError>>;
}

#[derive(Clone)]
pub struct DataCache {
    entries: Rc<RefCell<HashMap<String, CacheEntry>>>,
    fetcher: Rc<dyn ResourceFetcher>,
}

impl DataCache {
    /// A cache seeded with the built-in `basics_dict`.
    pub fn new(fetcher: Rc<dyn ResourceFetcher>) -> Self {
        let cache = Self::empty(fetcher);
        match CacheEntry::from_json(BASICS_KEY, BUILTIN_BASICS) {
            Ok(entry) => cache.insert(BASICS_KEY, entry),
            Err(err) => tracing::warn!(%err, "built-in basics could not be parsed"),
        }
        cache
    }

    pub fn empty(fetcher: Rc<dyn ResourceFetcher>) -> Self {
        Self {
            entries: Rc::new(RefCell::new(HashMap::new())),
            fetcher,
        }
    }

    /// Memoised lookup; fetches and stores on a miss.
    pub async fn get(&self, name: &str) -> Result<CacheEntry, DataError> {
        let cached = self.entries.borrow().get(name).cloned();
        if let Some(entry) = cached {
            return Ok(entry);
        }

        tracing::debug!(resource = name, "cache miss, fetching");
        let raw = self.fetcher.fetch(name).await.map_err(|err| {
            tracing::warn!(resource = name, %err, "resource fetch failed");
            err
        })?;
        let entry = CacheEntry::from_json(name, &raw)?;
        self.insert(name, entry.clone());
        Ok(entry)
    }

    pub async fn dataset(&self, name: &str) -> Result<Rc<Dataset>, DataError> {
        self.get(name).await?.into_dataset(name)
    }

    pub async fn scalars(&self, name: &str) -> Result<Rc<ScalarDict>, DataError> {
        self.get(name).await?.into_scalars(name)
    }

    pub fn insert(&self, name: &str, entry: CacheEntry) {
        self.entries.borrow_mut().insert(name.to_string(), entry);
    }

    /// Swap the entire content for `entries`. Nothing from before survives.
    pub fn replace(&self, entries: HashMap<String, CacheEntry>) {
        tracing::info!(entries = entries.len(), "cache replaced");
        *self.entries.borrow_mut() = entries;
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// In-memory fetcher for tests and previews. Counts every fetch.
#[derive(Default)]
pub struct MemoryFetcher {
    resources: RefCell<HashMap<String, String>>,
    calls: RefCell<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, name: &str, json: &str) -> Self {
        self.resources
            .borrow_mut()
            .insert(name.to_string(), json.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_for(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|call| *call == name).count()
    }
}

impl ResourceFetcher for MemoryFetcher {
    fn fetch<'a>(&'a self, name: &'a str) -> LocalBoxFuture<'a, Result<String, DataError>> {
        Box::pin(async move {
            self.calls.borrow_mut().push(name.to_string());
            self.resources
                .borrow()
                .get(name)
                .cloned()
                .ok_or_else(|| DataError::Fetch {
                    name: name.to_string(),
                    message: "404 Not Found".to_string(),
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dataset::Cell;
    use futures::executor::block_on;

    const ARTISTS: &str =
        r#"{"columns": ["artist", "play count"], "data": [["Gorillaz", 1204], ["Lana Del Rey", 998]]}"#;

    fn cache_with(fetcher: MemoryFetcher) -> (DataCache, Rc<MemoryFetcher>) {
        let fetcher = Rc::new(fetcher);
        (DataCache::new(fetcher.clone()), fetcher)
    }

    #[test]
    fn starts_with_builtin_basics() {
        let (cache, fetcher) = cache_with(MemoryFetcher::new());
        assert!(cache.contains(BASICS_KEY));
        let basics = block_on(cache.scalars(BASICS_KEY)).unwrap();
        assert!(basics.contains_key("top_1_artist"));
        assert!(fetcher.calls().is_empty());
    }

    #[test]
    fn miss_fetches_once_then_hits() {
        let (cache, fetcher) =
            cache_with(MemoryFetcher::new().with("most_played_artists_total", ARTISTS));

        let first = block_on(cache.dataset("most_played_artists_total")).unwrap();
        let second = block_on(cache.dataset("most_played_artists_total")).unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.calls_for("most_played_artists_total"), 1);
    }

    #[test]
    fn replace_swaps_everything() {
        let (cache, fetcher) = cache_with(
            MemoryFetcher::new()
                .with("a", r#"{"columns": ["x"], "data": [[1]]}"#)
                .with("b", r#"{"columns": ["y"], "data": [[2]]}"#),
        );
        block_on(cache.dataset("a")).unwrap();

        let replacement = Dataset::new(vec!["x".into()], vec![vec![Cell::Number(42.0)]]);
        let mut entries = HashMap::new();
        entries.insert("a".to_string(), CacheEntry::from(replacement.clone()));
        cache.replace(entries);

        let after = block_on(cache.dataset("a")).unwrap();
        assert_eq!(*after, replacement);
        assert!(!cache.contains(BASICS_KEY));
        assert_eq!(fetcher.calls_for("a"), 1);

        block_on(cache.dataset("b")).unwrap();
        assert_eq!(fetcher.calls_for("b"), 1);
    }

    #[test]
    fn failed_fetch_is_not_cached() {
        let (cache, fetcher) = cache_with(MemoryFetcher::new());
        let err = block_on(cache.get("missing")).unwrap_err();
        assert!(matches!(err, DataError::Fetch { .. }));
        assert!(!cache.contains("missing"));
        let _ = block_on(cache.get("missing"));
        assert_eq!(fetcher.calls_for("missing"), 2);
    }

    #[test]
    fn wrong_kind_is_reported() {
        let (cache, _) = cache_with(MemoryFetcher::new());
        let err = block_on(cache.dataset(BASICS_KEY)).unwrap_err();
        assert!(matches!(err, DataError::WrongKind { .. }));
    }
}
