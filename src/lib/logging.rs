//! Formatting helpers for log output, operation timing and the end-of-run summary.

use std::time::{Duration, Instant};

use crate::metrics::IterationMetric;

/// Formats a count with thousands separators.
///
/// # Examples
///
/// ```
/// use seedgrow_lib::logging::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a fraction as a percentage, e.g. `0.9543` with 2 decimals as `"95.43%"`.
///
/// ```
/// use seedgrow_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.5, 1), "50.0%");
/// assert_eq!(format_percent(1.0, 0), "100%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0)
}

/// Formats a duration with its two largest units: `"45s"`, `"2m 15s"`, `"1h 30m"`.
///
/// ```
/// use seedgrow_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// assert_eq!(format_duration(Duration::from_secs(3600)), "1h");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (major, major_unit, minor, minor_unit) = match secs {
        0..60 => return format!("{secs}s"),
        60..3600 => (secs / 60, "m", secs % 60, "s"),
        _ => (secs / 3600, "h", (secs % 3600) / 60, "m"),
    };
    if minor == 0 {
        format!("{major}{major_unit}")
    } else {
        format!("{major}{major_unit} {minor}{minor_unit}")
    }
}

/// Formats a processing rate, falling back to items per minute below one per second.
///
/// ```
/// use seedgrow_lib::logging::format_rate;
/// use std::time::Duration;
///
/// assert_eq!(format_rate(1000, Duration::from_secs(1)), "1,000 items/s");
/// assert_eq!(format_rate(30, Duration::from_secs(60)), "30.0 items/min");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} items/s", format_count(count));
    }

    let per_second = count as f64 / secs;
    if per_second >= 1.0 {
        format!("{} items/s", format_count(per_second as u64))
    } else {
        format!("{:.1} items/min", per_second * 60.0)
    }
}

/// Logs a per-iteration summary of a resolve run.
///
/// # Examples
///
/// ```no_run
/// use seedgrow_lib::logging::log_iteration_summary;
/// use seedgrow_lib::metrics::IterationMetric;
///
/// let metrics = vec![IterationMetric { trim_length: 18, input_reads: 100, ..Default::default() }];
/// log_iteration_summary(&metrics);
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn log_iteration_summary(metrics: &[IterationMetric]) {
    log::info!("Resolve Summary:");
    for metric in metrics {
        let resolved = if metric.aligned_reads > 0 {
            format_percent(metric.unique_reads as f64 / metric.aligned_reads as f64, 1)
        } else {
            "n/a".to_string()
        };
        log::info!(
            "  len{}: {} in, {} aligned, {} unaligned, {} unique ({resolved}), {} multimapped, {} lost",
            metric.trim_length,
            format_count(metric.input_reads),
            format_count(metric.aligned_reads),
            format_count(metric.unaligned_reads()),
            format_count(metric.unique_reads),
            format_count(metric.multimapped_reads),
            format_count(metric.lost_multimappers),
        );
    }

    let total_unique: u64 = metrics.iter().map(|m| m.unique_reads).sum();
    let total_lost: u64 = metrics.iter().map(|m| m.lost_multimappers).sum();
    let still_multimapped = metrics.last().map_or(0, |m| m.multimapped_reads);
    log::info!("  Uniquely resolved: {}", format_count(total_unique));
    log::info!("  Lost multimappers: {}", format_count(total_lost));
    log::info!("  Multimapped after the last iteration: {}", format_count(still_multimapped));
}

/// Operation timing and summary helper.
///
/// Tracks operation timing and provides formatted summary output.
///
/// # Examples
///
/// ```no_run
/// use seedgrow_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Processing reads");
///
/// // ... do work ...
///
/// timer.log_completion(10_000); // Log with item count
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Logs the completion with item count and rate.
    pub fn log_completion(&self, count: u64) {
        let duration = self.start_time.elapsed();
        log::info!(
            "{} completed: {} in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration)
        );
    }
}
