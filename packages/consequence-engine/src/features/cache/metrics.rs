//! Prometheus metrics for the query cache

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Histogram, HistogramOpts, IntCounter, IntGauge, Opts,
    Registry,
};

#[derive(Clone)]
pub struct QueryCacheMetrics {
    pub hits: IntCounter,
    pub misses: IntCounter,
    pub invalidations: IntCounter,
    pub entries: IntGauge,
    pub compute_seconds: Histogram,
}

impl QueryCacheMetrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        Ok(Self {
            hits: register_int_counter_with_registry!(
                Opts::new("consequence_cache_hits_total", "Query cache hits"),
                registry
            )?,
            misses: register_int_counter_with_registry!(
                Opts::new("consequence_cache_misses_total", "Query cache misses"),
                registry
            )?,
            invalidations: register_int_counter_with_registry!(
                Opts::new(
                    "consequence_cache_invalidations_total",
                    "Artifact-set invalidations"
                ),
                registry
            )?,
            entries: register_int_gauge_with_registry!(
                Opts::new("consequence_cache_entries", "Cached query results"),
                registry
            )?,
            compute_seconds: register_histogram_with_registry!(
                HistogramOpts::new(
                    "consequence_cache_compute_seconds",
                    "Analysis time on cache miss"
                ),
                registry
            )?,
        })
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.get() as f64;
        let total = hits + self.misses.get() as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}
