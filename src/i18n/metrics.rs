//! Translation metrics and observability module.
//!
//! Each resolver owns its own `TranslationMetrics`, so tests and separate
//! resolvers never share counters.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for one translation resolver.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Table requests answered from the cache
    cache_hits: AtomicUsize,

    /// Table requests that had to wait for a load
    cache_misses: AtomicUsize,

    /// Fetches issued to the translation source
    source_loads: AtomicUsize,

    /// Source fetches that failed or timed out
    source_failures: AtomicUsize,

    /// Non-default locale loads that fell back to the default table
    fallbacks: AtomicUsize,

    /// Lookups that echoed the raw key
    missing_keys: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_source_load(&self) {
        self.source_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_source_failure(&self) {
        self.source_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_missing_key(&self) {
        self.missing_keys.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn source_loads(&self) -> usize {
        self.source_loads.load(Ordering::Relaxed)
    }

    pub fn source_failures(&self) -> usize {
        self.source_failures.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn missing_keys(&self) -> usize {
        self.missing_keys.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let total_cache_queries = hits + misses;
        let cache_hit_rate = if total_cache_queries > 0 {
            (hits as f64 / total_cache_queries as f64) * 100.0
        } else {
            0.0
        };

        let loads = self.source_loads();
        let failures = self.source_failures();
        let load_success_rate = if loads > 0 {
            (loads.saturating_sub(failures) as f64 / loads as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate,
            source_loads: loads,
            source_failures: failures,
            load_success_rate,
            fallbacks: self.fallbacks(),
            missing_keys: self.missing_keys(),
        }
    }
}

/// Snapshot of the translation counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    pub source_loads: usize,
    pub source_failures: usize,

    /// Source load success rate as a percentage (0-100)
    pub load_success_rate: f64,

    pub fallbacks: usize,
    pub missing_keys: usize,
}
