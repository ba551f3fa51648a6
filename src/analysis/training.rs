// TrainingStore - bounded labeled-example buffer for nearest-neighbor voting
//
// Feedback calls append (features, label) pairs; once the capacity is
// exceeded the oldest example is evicted first. There is no retraining
// step: the nearest-neighbor strategy reading this buffer is the adaptive
// model. Contents can be persisted to JSON for session continuity.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use crate::analysis::classifier::SoundClass;
use crate::analysis::features::FeatureVector;
use crate::error::TrainingError;

/// Default capacity of the training buffer
pub const DEFAULT_CAPACITY: usize = 1000;

/// A labeled feature record supplied via feedback
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct TrainingExample {
    pub features: FeatureVector,
    pub label: SoundClass,
}

/// FIFO-evicted store of labeled examples
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct TrainingStore {
    examples: VecDeque<TrainingExample>,
    capacity: usize,
}

impl TrainingStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            examples: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
        }
    }

    /// Append an example, evicting the oldest if at capacity
    pub fn push(&mut self, features: FeatureVector, label: SoundClass) {
        if self.capacity == 0 {
            return;
        }
        if self.examples.len() == self.capacity {
            self.examples.pop_front();
        }
        self.examples.push_back(TrainingExample { features, label });
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change capacity, trimming oldest examples if shrinking
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.examples.len() > capacity {
            self.examples.pop_front();
        }
    }

    /// Iterate stored examples, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &TrainingExample> {
        self.examples.iter()
    }

    /// Per-label counts, in label declaration order
    pub fn label_counts(&self) -> Vec<(SoundClass, usize)> {
        SoundClass::ALL
            .iter()
            .map(|&label| {
                let count = self.examples.iter().filter(|e| e.label == label).count();
                (label, count)
            })
            .filter(|&(_, count)| count > 0)
            .collect()
    }

    /// Write the store to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TrainingError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a store back from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrainingError> {
        let contents = fs::read_to_string(path)?;
        let store = serde_json::from_str(&contents)?;
        Ok(store)
    }
}
