//! Real-time monitoring - latency accounting and the polled metrics snapshot
//!
//! The engine records wall-clock latency for every analysis call and keeps a
//! rolling window for the average/max gauges. While monitoring is enabled it
//! additionally publishes a last-written-wins snapshot of the newest scalar
//! results for external polling. Extraction itself never depends on the
//! monitoring state.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::analysis::classifier::SoundClass;

/// Snapshot of the latest scalar results
///
/// Overwritten on every monitored analysis call; no independent lifecycle
/// beyond "last written wins".
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RealTimeMetrics {
    /// Spectral centroid of the newest block in Hz
    pub centroid: f32,
    /// RMS level of the newest block
    pub rms: f32,
    /// Fundamental of the newest block in Hz, 0 when unpitched
    pub pitch_hz: f32,
    /// Most recent classification label
    pub label: SoundClass,
    /// Most recent classification confidence
    pub confidence: f32,
    /// Current history buffer occupancy
    pub history_len: usize,
    /// Wall-clock latency of the newest analysis call in milliseconds
    pub latency_ms: f32,
}

impl Default for RealTimeMetrics {
    fn default() -> Self {
        Self {
            centroid: 0.0,
            rms: 0.0,
            pitch_hz: 0.0,
            label: SoundClass::Unknown,
            confidence: 0.0,
            history_len: 0,
            latency_ms: 0.0,
        }
    }
}

/// Rolling window over recent latency observations
struct LatencyTracker {
    samples: VecDeque<f32>,
    max_samples: usize,
}

impl LatencyTracker {
    fn new(max_samples: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(max_samples),
            max_samples,
        }
    }

    fn observe(&mut self, value: f32) -> (f32, f32, usize) {
        if self.samples.len() == self.max_samples {
            self.samples.pop_front();
        }
        self.samples.push_back(value.abs());

        let count = self.samples.len();
        let sum: f32 = self.samples.iter().copied().sum();
        let max = self
            .samples
            .iter()
            .copied()
            .fold(0.0_f32, |acc, next| acc.max(next));
        let avg = if count == 0 { 0.0 } else { sum / count as f32 };
        (avg, max, count)
    }
}

/// Monitor wrapping the analysis entry point
pub struct RealTimeMonitor {
    enabled: AtomicBool,
    latency: Mutex<LatencyTracker>,
    snapshot: Mutex<RealTimeMetrics>,
}

impl RealTimeMonitor {
    pub fn new(latency_window: usize) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            latency: Mutex::new(LatencyTracker::new(latency_window)),
            snapshot: Mutex::new(RealTimeMetrics::default()),
        }
    }

    /// Enable or disable snapshot publication
    ///
    /// Disabling halts publication only; latency is still accounted.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Record one call's latency; returns the rolling average
    pub fn observe_latency(&self, latency_ms: f32) -> f32 {
        let mut tracker = match self.latency.lock() {
            Ok(guard) => guard,
            Err(_) => {
                log::error!("Latency tracker lock poisoned");
                return latency_ms;
            }
        };
        let (avg, _max, _count) = tracker.observe(latency_ms);
        avg
    }

    /// Publish a new snapshot if monitoring is enabled
    pub fn publish(&self, metrics: RealTimeMetrics) {
        if !self.is_enabled() {
            return;
        }
        match self.snapshot.lock() {
            Ok(mut guard) => *guard = metrics,
            Err(_) => log::error!("Monitor snapshot lock poisoned"),
        }
    }

    /// Copy of the most recently published snapshot
    pub fn snapshot(&self) -> RealTimeMetrics {
        match self.snapshot.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => {
                log::error!("Monitor snapshot lock poisoned");
                RealTimeMetrics::default()
            }
        }
    }
}

impl Default for RealTimeMonitor {
    fn default() -> Self {
        Self::new(32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(centroid: f32) -> RealTimeMetrics {
        RealTimeMetrics {
            centroid,
            ..RealTimeMetrics::default()
        }
    }

    #[test]
    fn test_publish_and_snapshot() {
        let monitor = RealTimeMonitor::default();
        monitor.publish(metrics(440.0));
        assert_eq!(monitor.snapshot().centroid, 440.0);

        // Last write wins
        monitor.publish(metrics(880.0));
        assert_eq!(monitor.snapshot().centroid, 880.0);
    }

    #[test]
    fn test_disabled_monitor_keeps_old_snapshot() {
        let monitor = RealTimeMonitor::default();
        monitor.publish(metrics(100.0));

        monitor.set_enabled(false);
        monitor.publish(metrics(999.0));
        assert_eq!(monitor.snapshot().centroid, 100.0);

        monitor.set_enabled(true);
        monitor.publish(metrics(200.0));
        assert_eq!(monitor.snapshot().centroid, 200.0);
    }

    #[test]
    fn test_latency_rolling_average() {
        let monitor = RealTimeMonitor::new(3);
        monitor.observe_latency(1.0);
        monitor.observe_latency(2.0);
        let avg = monitor.observe_latency(3.0);
        assert!((avg - 2.0).abs() < 1e-6);

        // Window drops the oldest observation
        let avg = monitor.observe_latency(7.0);
        assert!((avg - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_latency_accounted_while_disabled() {
        let monitor = RealTimeMonitor::new(4);
        monitor.set_enabled(false);
        let avg = monitor.observe_latency(5.0);
        assert!((avg - 5.0).abs() < 1e-6);
    }
}
