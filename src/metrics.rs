//! Conversion metrics and observability.
//!
//! Counters for the work the eligibility policy does: how many leaves were
//! converted each way and how many failed. Process-wide, lock-free atomics;
//! recorded by the query-tree walker and readable by hosts that expose
//! operational metrics.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Global conversion metrics singleton.
#[derive(Default)]
pub struct ConversionMetrics {
    /// Number of date/timestamp leaves converted to canonical form
    dates_converted: AtomicUsize,

    /// Number of decimal leaves converted to canonical form
    decimals_converted: AtomicUsize,

    /// Number of leaves whose conversion failed
    failures: AtomicUsize,
}

/// Global metrics instance (initialized lazily)
static METRICS: OnceLock<ConversionMetrics> = OnceLock::new();

impl ConversionMetrics {
    /// Create a zeroed metrics instance.
    pub fn new() -> Self {
        ConversionMetrics {
            dates_converted: AtomicUsize::new(0),
            decimals_converted: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    /// Get the global conversion metrics instance.
    pub fn global() -> &'static ConversionMetrics {
        METRICS.get_or_init(ConversionMetrics::new)
    }

    /// Record a successful date or timestamp leaf conversion.
    pub fn record_date(&self) {
        self.dates_converted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful decimal leaf conversion.
    pub fn record_decimal(&self) {
        self.decimals_converted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed leaf conversion.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current converted-date count.
    pub fn dates_converted(&self) -> usize {
        self.dates_converted.load(Ordering::Relaxed)
    }

    /// Get the current converted-decimal count.
    pub fn decimals_converted(&self) -> usize {
        self.decimals_converted.load(Ordering::Relaxed)
    }

    /// Get the current failure count.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report snapshot.
    pub fn report(&self) -> MetricsReport {
        let dates = self.dates_converted();
        let decimals = self.decimals_converted();
        let failures = self.failures();
        let attempts = dates + decimals + failures;

        let success_rate = if attempts > 0 {
            ((attempts - failures) as f64 / attempts as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            dates_converted: dates,
            decimals_converted: decimals,
            failures,
            success_rate,
        }
    }

}

/// Snapshot of the current conversion statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of date/timestamp leaves converted
    pub dates_converted: usize,

    /// Number of decimal leaves converted
    pub decimals_converted: usize,

    /// Number of failed leaf conversions
    pub failures: usize,

    /// Conversion success rate as a percentage (0-100)
    pub success_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Local instances keep these assertions independent of anything else in
    // the process that records into the global.
    #[test]
    fn test_record_counters() {
        let metrics = ConversionMetrics::new();

        metrics.record_date();
        metrics.record_date();
        metrics.record_decimal();
        metrics.record_failure();

        assert_eq!(metrics.dates_converted(), 2);
        assert_eq!(metrics.decimals_converted(), 1);
        assert_eq!(metrics.failures(), 1);
    }

    #[test]
    fn test_report_success_rate() {
        let metrics = ConversionMetrics::new();

        // 3 successes, 1 failure = 75%.
        metrics.record_date();
        metrics.record_decimal();
        metrics.record_decimal();
        metrics.record_failure();

        let report = metrics.report();
        assert_eq!(report.dates_converted, 1);
        assert_eq!(report.decimals_converted, 2);
        assert_eq!(report.failures, 1);
        assert_eq!(report.success_rate, 75.0);
    }

    #[test]
    fn test_report_empty() {
        let metrics = ConversionMetrics::new();

        let report = metrics.report();
        assert_eq!(report.success_rate, 0.0);
    }

    #[test]
    fn test_global_returns_same_instance() {
        let metrics1 = ConversionMetrics::global();
        let metrics2 = ConversionMetrics::global();

        assert!(std::ptr::eq(metrics1, metrics2));
    }
}
