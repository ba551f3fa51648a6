//! Processing statistics - running counts and a rolling timing average
//!
//! Tracks how many blocks and classifications the engine has handled, how
//! the classifications split across categories, and the arithmetic mean of
//! processing time over the most recent observations.

use std::collections::VecDeque;

use crate::analysis::classifier::SoundClass;

/// Number of timing samples the rolling average spans
pub const TIMING_WINDOW: usize = 1000;

/// Snapshot of collected statistics
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisStats {
    /// Total audio blocks analyzed
    pub blocks_processed: u64,
    /// Total classification calls
    pub classifications: u64,
    /// Classification counts per category, declaration order, zeros omitted
    pub class_counts: Vec<(SoundClass, u64)>,
    /// Rolling mean processing time in milliseconds
    pub avg_processing_ms: f32,
    /// Current training store occupancy
    pub training_len: usize,
}

/// Accumulates counts and timing observations
pub struct StatsCollector {
    blocks_processed: u64,
    classifications: u64,
    class_counts: [u64; SoundClass::ALL.len()],
    timings: VecDeque<f32>,
    timing_window: usize,
}

impl StatsCollector {
    pub fn new(timing_window: usize) -> Self {
        Self {
            blocks_processed: 0,
            classifications: 0,
            class_counts: [0; SoundClass::ALL.len()],
            timings: VecDeque::with_capacity(timing_window.min(TIMING_WINDOW)),
            timing_window,
        }
    }

    /// Record one analyzed block and its processing time
    pub fn record_block(&mut self, processing_ms: f32) {
        self.blocks_processed += 1;
        if self.timings.len() == self.timing_window {
            self.timings.pop_front();
        }
        self.timings.push_back(processing_ms);
    }

    /// Record one classification outcome
    pub fn record_classification(&mut self, label: SoundClass) {
        self.classifications += 1;
        if let Some(index) = SoundClass::ALL.iter().position(|&c| c == label) {
            self.class_counts[index] += 1;
        }
    }

    fn avg_processing_ms(&self) -> f32 {
        if self.timings.is_empty() {
            return 0.0;
        }
        self.timings.iter().sum::<f32>() / self.timings.len() as f32
    }

    /// Copy of the current statistics
    pub fn snapshot(&self, training_len: usize) -> AnalysisStats {
        let class_counts = SoundClass::ALL
            .iter()
            .zip(self.class_counts.iter())
            .filter(|&(_, &count)| count > 0)
            .map(|(&label, &count)| (label, count))
            .collect();

        AnalysisStats {
            blocks_processed: self.blocks_processed,
            classifications: self.classifications,
            class_counts,
            avg_processing_ms: self.avg_processing_ms(),
            training_len,
        }
    }
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new(TIMING_WINDOW)
    }
}
