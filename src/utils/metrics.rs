//! Observability and Metrics
//!
//! This module provides counters for monitoring how the attribute engine behaves:
//! how many attributes were written and read, how often optional attributes were
//! skipped, and how errors split between codecs and bindings.
//!
//! Uses atomic counters for thread-safe metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Global metrics collector for engine operations
#[derive(Debug)]
pub struct Metrics {
    /// Attributes encoded to a sink
    pub attributes_written: AtomicU64,
    /// Attributes decoded from a source
    pub attributes_read: AtomicU64,
    /// Optional attributes skipped at serialize time because they were absent
    pub absent_skips: AtomicU64,
    /// Optional attributes skipped at deserialize time because their bytes had not arrived
    pub short_read_skips: AtomicU64,
    /// Required attributes found absent at serialize time
    pub required_missing: AtomicU64,
    /// Codec failures
    pub codec_errors: AtomicU64,
    /// Binding failures
    pub binding_errors: AtomicU64,
    /// Strategies built by the field access factory
    pub strategies_resolved: AtomicU64,
    /// Strategy lookups served from the cache
    pub strategy_cache_hits: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            attributes_written: AtomicU64::new(0),
            attributes_read: AtomicU64::new(0),
            absent_skips: AtomicU64::new(0),
            short_read_skips: AtomicU64::new(0),
            required_missing: AtomicU64::new(0),
            codec_errors: AtomicU64::new(0),
            binding_errors: AtomicU64::new(0),
            strategies_resolved: AtomicU64::new(0),
            strategy_cache_hits: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn attribute_written(&self) {
        self.attributes_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn attribute_read(&self) {
        self.attributes_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn absent_skip(&self) {
        self.absent_skips.fetch_add(1, Ordering::Relaxed);
    }

    pub fn short_read_skip(&self) {
        self.short_read_skips.fetch_add(1, Ordering::Relaxed);
    }

    pub fn required_missing(&self) {
        self.required_missing.fetch_add(1, Ordering::Relaxed);
    }

    pub fn codec_error(&self) {
        self.codec_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn binding_error(&self) {
        self.binding_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn strategy_resolved(&self) {
        self.strategies_resolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn strategy_cache_hit(&self) {
        self.strategy_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            attributes_written: self.attributes_written.load(Ordering::Relaxed),
            attributes_read: self.attributes_read.load(Ordering::Relaxed),
            absent_skips: self.absent_skips.load(Ordering::Relaxed),
            short_read_skips: self.short_read_skips.load(Ordering::Relaxed),
            required_missing: self.required_missing.load(Ordering::Relaxed),
            codec_errors: self.codec_errors.load(Ordering::Relaxed),
            binding_errors: self.binding_errors.load(Ordering::Relaxed),
            strategies_resolved: self.strategies_resolved.load(Ordering::Relaxed),
            strategy_cache_hits: self.strategy_cache_hits.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            attributes_written = snapshot.attributes_written,
            attributes_read = snapshot.attributes_read,
            absent_skips = snapshot.absent_skips,
            short_read_skips = snapshot.short_read_skips,
            required_missing = snapshot.required_missing,
            codec_errors = snapshot.codec_errors,
            binding_errors = snapshot.binding_errors,
            strategies_resolved = snapshot.strategies_resolved,
            strategy_cache_hits = snapshot.strategy_cache_hits,
            uptime_seconds = snapshot.uptime_seconds,
            "Attribute engine metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub attributes_written: u64,
    pub attributes_read: u64,
    pub absent_skips: u64,
    pub short_read_skips: u64,
    pub required_missing: u64,
    pub codec_errors: u64,
    pub binding_errors: u64,
    pub strategies_resolved: u64,
    pub strategy_cache_hits: u64,
    pub uptime_seconds: u64,
}

/// Global metrics instance (lazy static for simplicity)
static METRICS: once_cell::sync::Lazy<Metrics> = once_cell::sync::Lazy::new(Metrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static Metrics {
    &METRICS
}

/// Initialize metrics collection (call once at startup)
pub fn init_metrics() {
    let _ = global_metrics();
    info!("Metrics collection initialized");
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = Metrics::new();
        metrics.attribute_written();
        metrics.attribute_written();
        metrics.short_read_skip();
        metrics.strategy_cache_hit();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.attributes_written, 2);
        assert_eq!(snapshot.short_read_skips, 1);
        assert_eq!(snapshot.strategy_cache_hits, 1);
        assert_eq!(snapshot.codec_errors, 0);
    }

    #[test]
    fn test_global_metrics_is_singleton() {
        let a = global_metrics() as *const Metrics;
        let b = global_metrics() as *const Metrics;
        assert_eq!(a, b);
    }
}
