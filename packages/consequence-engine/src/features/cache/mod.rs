//! Query cache
//!
//! Memoizes analysis results per (artifact set, instance, analysis kind,
//! predicate). Buckets are tagged with the artifact-set revision, so a
//! result computed before a recompilation is never served after it.
//!
//! - `QueryCache`: parking_lot RwLock over per-set buckets
//! - `QueryCacheMetrics`: prometheus counters, entry gauge, compute histogram

mod metrics;
mod query_cache;
mod types;

pub use metrics::QueryCacheMetrics;
pub use query_cache::QueryCache;
pub use types::{CacheEntry, CacheStats, QueryKey};
