//! Prometheus metrics for the property facade.
//!
//! Every facade call records its outcome and latency; favorite toggles and
//! persistence warnings have dedicated counters. Recording never fails a call.
//!
//! # Example
//! ```no_run
//! use property_browser::metrics::{init_metrics, gather_metrics, OPERATIONS_TOTAL};
//!
//! init_metrics().ok();
//! OPERATIONS_TOTAL.with_label_values(&["search", "ok"]).inc();
//! println!("{}", gather_metrics());
//! ```

mod decorators;

pub use decorators::measure_operation;

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, HistogramOpts, HistogramVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Facade operations by name and outcome
    ///
    /// Labels: operation, outcome
    pub static ref OPERATIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("operations_total", "Total number of facade operations")
            .namespace("property_browser"),
        &["operation", "outcome"]
    ).expect("Failed to create OPERATIONS_TOTAL metric");

    /// Facade operation latency, including simulated delay
    ///
    /// Labels: operation
    pub static ref OPERATION_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "operation_duration_seconds",
            "Facade operation latency in seconds"
        )
        .namespace("property_browser")
        .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
        &["operation"]
    ).expect("Failed to create OPERATION_DURATION_SECONDS metric");

    /// Favorite toggles by direction
    ///
    /// Labels: direction (added, removed)
    pub static ref FAVORITE_TOGGLES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("favorite_toggles_total", "Total number of favorite toggles")
            .namespace("property_browser"),
        &["direction"]
    ).expect("Failed to create FAVORITE_TOGGLES_TOTAL metric");

    /// Favorite changes that could not be persisted
    pub static ref PERSISTENCE_WARNINGS_TOTAL: Counter = Counter::with_opts(
        Opts::new(
            "persistence_warnings_total",
            "Favorite changes applied in memory but not persisted"
        )
        .namespace("property_browser")
    ).expect("Failed to create PERSISTENCE_WARNINGS_TOTAL metric");
}

/// Register all metrics with the global registry
pub fn init_metrics() -> Result<(), prometheus::Error> {
    PROMETHEUS_REGISTRY.register(Box::new(OPERATIONS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(OPERATION_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(FAVORITE_TOGGLES_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(PERSISTENCE_WARNINGS_TOTAL.clone()))?;

    tracing::info!("Prometheus metrics registered");
    Ok(())
}

/// Render all registered metrics in Prometheus text format
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}

/// Count a favorite toggle
pub fn record_toggle(is_favorite: bool, persisted: bool) {
    let direction = if is_favorite { "added" } else { "removed" };
    FAVORITE_TOGGLES_TOTAL.with_label_values(&[direction]).inc();
    if !persisted {
        PERSISTENCE_WARNINGS_TOTAL.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initialization() {
        // Global registry: a second registration in the same process errors
        let _ = init_metrics();
        OPERATIONS_TOTAL
            .with_label_values(&["metrics_init_check", "ok"])
            .inc();

        let exported = gather_metrics();
        assert!(exported.contains("property_browser_operations_total"));
        assert!(exported.contains("metrics_init_check"));
    }

    #[test]
    fn test_record_toggle_counts() {
        let before = FAVORITE_TOGGLES_TOTAL.with_label_values(&["added"]).get();
        let warnings_before = PERSISTENCE_WARNINGS_TOTAL.get();

        record_toggle(true, false);

        // Other tests share the global counters, so only a lower bound holds
        assert!(FAVORITE_TOGGLES_TOTAL.with_label_values(&["added"]).get() >= before + 1.0);
        assert!(PERSISTENCE_WARNINGS_TOTAL.get() >= warnings_before + 1.0);
    }
}
