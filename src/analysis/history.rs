// History module - temporal smoothing and the bounded feature history
//
// Successive feature records are blended with an exponential coefficient,
// then retained in an insertion-ordered buffer that evicts oldest-first.
// The buffer holds copies only; callers never receive references into it.

use std::collections::VecDeque;

use super::features::FeatureVector;

/// Blend two feature records
///
/// Every scalar field becomes `alpha * current + (1 - alpha) * previous`.
/// The MFCC and chroma arrays pass through from `current` unsmoothed:
/// cepstral and pitch-class bins are consumed as per-block shapes, not
/// trend lines.
///
/// # Arguments
/// * `current` - The record extracted from the newest block
/// * `previous` - The previously smoothed record
/// * `alpha` - Smoothing coefficient in [0, 1]; 1 keeps only the current
pub fn smooth(current: &FeatureVector, previous: &FeatureVector, alpha: f32) -> FeatureVector {
    let blend = |cur: f32, prev: f32| alpha * cur + (1.0 - alpha) * prev;

    FeatureVector {
        centroid: blend(current.centroid, previous.centroid),
        rolloff: blend(current.rolloff, previous.rolloff),
        flatness: blend(current.flatness, previous.flatness),
        bandwidth: blend(current.bandwidth, previous.bandwidth),
        mfcc: current.mfcc,
        chroma: current.chroma,
        zcr: blend(current.zcr, previous.zcr),
        energy: blend(current.energy, previous.energy),
        rms: blend(current.rms, previous.rms),
        variance: blend(current.variance, previous.variance),
        pitch_hz: blend(current.pitch_hz, previous.pitch_hz),
        harmonic_ratio: blend(current.harmonic_ratio, previous.harmonic_ratio),
        brightness: blend(current.brightness, previous.brightness),
        warmth: blend(current.warmth, previous.warmth),
        clarity: blend(current.clarity, previous.clarity),
        roughness: blend(current.roughness, previous.roughness),
        richness: blend(current.richness, previous.richness),
    }
}

/// Insertion-ordered buffer of recent smoothed records
///
/// Pushing past capacity evicts the oldest entry first. The engine wraps
/// this in a short-held lock; nothing here blocks.
#[derive(Debug)]
pub struct FeatureHistory {
    entries: VecDeque<FeatureVector>,
    capacity: usize,
}

impl FeatureHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a record, evicting the oldest if at capacity
    pub fn push(&mut self, features: FeatureVector) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(features);
    }

    /// Most recently pushed record, if any
    pub fn latest(&self) -> Option<FeatureVector> {
        self.entries.back().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change capacity, trimming oldest entries if shrinking
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.entries.len() > capacity {
            self.entries.pop_front();
        }
    }

    /// Copy of the buffered records, oldest first
    pub fn to_vec(&self) -> Vec<FeatureVector> {
        self.entries.iter().copied().collect()
    }

    /// Drop all buffered records
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(centroid: f32) -> FeatureVector {
        FeatureVector {
            centroid,
            ..FeatureVector::zeroed()
        }
    }

    #[test]
    fn test_smooth_blends_scalars() {
        let mut current = FeatureVector::zeroed();
        current.centroid = 1000.0;
        current.rms = 0.8;
        let mut previous = FeatureVector::zeroed();
        previous.centroid = 500.0;
        previous.rms = 0.4;

        let blended = smooth(&current, &previous, 0.25);
        assert!((blended.centroid - (0.25 * 1000.0 + 0.75 * 500.0)).abs() < 1e-3);
        assert!((blended.rms - (0.25 * 0.8 + 0.75 * 0.4)).abs() < 1e-6);
    }

    #[test]
    fn test_smooth_alpha_extremes() {
        let current = tagged(2000.0);
        let previous = tagged(100.0);

        assert_eq!(smooth(&current, &previous, 1.0).centroid, 2000.0);
        assert_eq!(smooth(&current, &previous, 0.0).centroid, 100.0);
    }

    #[test]
    fn test_smooth_passes_arrays_through() {
        let mut current = FeatureVector::zeroed();
        current.mfcc[0] = 5.0;
        current.chroma[3] = 1.0;
        let mut previous = FeatureVector::zeroed();
        previous.mfcc[0] = -5.0;
        previous.chroma[3] = 0.0;

        let blended = smooth(&current, &previous, 0.5);
        assert_eq!(blended.mfcc[0], 5.0);
        assert_eq!(blended.chroma[3], 1.0);
    }

    #[test]
    fn test_history_evicts_oldest_first() {
        let mut history = FeatureHistory::new(3);
        for centroid in [1.0, 2.0, 3.0, 4.0, 5.0] {
            history.push(tagged(centroid));
        }

        assert_eq!(history.len(), 3);
        let kept: Vec<f32> = history.to_vec().iter().map(|f| f.centroid).collect();
        assert_eq!(kept, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_history_latest() {
        let mut history = FeatureHistory::new(4);
        assert!(history.latest().is_none());

        history.push(tagged(7.0));
        history.push(tagged(8.0));
        assert_eq!(history.latest().unwrap().centroid, 8.0);
    }

    #[test]
    fn test_history_shrink_capacity_trims_front() {
        let mut history = FeatureHistory::new(5);
        for centroid in [1.0, 2.0, 3.0, 4.0, 5.0] {
            history.push(tagged(centroid));
        }

        history.set_capacity(2);
        let kept: Vec<f32> = history.to_vec().iter().map(|f| f.centroid).collect();
        assert_eq!(kept, vec![4.0, 5.0]);

        history.push(tagged(6.0));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_history_zero_capacity_stays_empty() {
        let mut history = FeatureHistory::new(0);
        history.push(tagged(1.0));
        assert!(history.is_empty());
    }
}
