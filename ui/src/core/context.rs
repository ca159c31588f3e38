//! Explicit dashboard state handed to every renderer.
//!
//! Holds the data cache and the "showing the visitor's own data" flag.
//! Both are reset together by [`DashboardContext::load_user_data`] when an
//! upload or a filter run produces a fresh generation of datasets.
//!
//! Tables on screen also leave their current row order here, keyed by
//! container id, so image exports match what the reader sorted.

use std::cell::{Cell as Flag, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::cache::{DataCache, ResourceFetcher};
use super::dataset::{CacheEntry, Dataset, ScalarDict, BASICS_KEY};

#[derive(Clone)]
pub struct DashboardContext {
    cache: DataCache,
    personalized: Rc<Flag<bool>>,
    generation: Rc<Flag<u32>>,
    row_orders: Rc<RefCell<HashMap<String, Vec<usize>>>>,
}

impl DashboardContext {
    pub fn new(fetcher: Rc<dyn ResourceFetcher>) -> Self {
        Self::with_cache(DataCache::new(fetcher))
    }

    pub fn with_cache(cache: DataCache) -> Self {
        Self {
            cache,
            personalized: Rc::new(Flag::new(false)),
            generation: Rc::new(Flag::new(0)),
            row_orders: Rc::default(),
        }
    }

    pub fn cache(&self) -> &DataCache {
        &self.cache
    }

    /// Whether texts should address the visitor ("you") rather than the
    /// demo owner ("I").
    pub fn is_personalized(&self) -> bool {
        self.personalized.get()
    }

    /// Bumped on every full reload; lets the UI drop state tied to old data.
    pub fn generation(&self) -> u32 {
        self.generation.get()
    }

    /// Display order of the table in `container_id`, as indices into its rows.
    pub fn remember_row_order(&self, container_id: &str, order: Vec<usize>) {
        self.row_orders
            .borrow_mut()
            .insert(container_id.to_string(), order);
    }

    pub fn row_order(&self, container_id: &str) -> Option<Vec<usize>> {
        self.row_orders.borrow().get(container_id).cloned()
    }

    /// Drop remembered orders; the tables they belonged to are gone.
    pub fn forget_row_orders(&self) {
        self.row_orders.borrow_mut().clear();
    }

    /// Full swap to a freshly crunched data set.
    pub fn load_user_data<I>(&self, datasets: I, single_values: ScalarDict)
    where
        I: IntoIterator<Item = (String, Dataset)>,
    {
        let mut entries: HashMap<String, CacheEntry> = datasets
            .into_iter()
            .map(|(name, dataset)| (name, CacheEntry::from(dataset)))
            .collect();
        entries.insert(BASICS_KEY.to_string(), CacheEntry::from(single_values));

        self.cache.replace(entries);
        self.forget_row_orders();
        self.personalized.set(true);
        self.generation.set(self.generation.get().wrapping_add(1));
    }
}

impl PartialEq for DashboardContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.personalized, &other.personalized)
    }
}
