//! Platform-agnostic building blocks: data model, cache, formatting,
//! filter helpers and the platform glue they sit on.

pub mod cache;
pub mod context;
pub mod dataset;
pub mod filters;
pub mod format;
pub mod platform;
pub mod progress;

pub use cache::{DataCache, ResourceFetcher};
pub use context::DashboardContext;
pub use dataset::{CacheEntry, DataError, BASICS_KEY};
