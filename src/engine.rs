// AnalysisEngine - the owning component behind every public operation
//
// Owns all shared mutable state (history, training store, stats, monitor
// snapshot) behind short-held locks and exposes only copy-returning
// accessors. Every operation is a synchronous, bounded-time call: the
// windowing/transform/feature computation runs outside any lock, so a
// concurrent feedback or configuration call never stalls an audio-thread
// analysis for an unbounded duration.
//
// Configuration is applied atomically at call boundaries. An analysis call
// captures a config snapshot (plus the extractor built for it) when it
// starts and completes with that snapshot even if the config changes
// mid-flight.

use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use crate::analysis::classifier::{self, ClassificationResult, SoundClass};
use crate::analysis::features::pitch::PitchDetector;
use crate::analysis::features::{FeatureExtractor, FeatureVector};
use crate::analysis::history::{self, FeatureHistory};
use crate::analysis::training::TrainingStore;
use crate::config::AnalysisConfig;
use crate::error::{log_config_error, ConfigError, TrainingError};
use crate::events::EventSink;
use crate::monitor::{RealTimeMetrics, RealTimeMonitor};
use crate::stats::{AnalysisStats, StatsCollector};

/// The active configuration and the extractor built for it, swapped as one
struct ActiveConfig {
    config: AnalysisConfig,
    extractor: Arc<FeatureExtractor>,
}

/// Real-time audio analysis and classification engine
pub struct AnalysisEngine {
    active: RwLock<ActiveConfig>,
    history: Mutex<FeatureHistory>,
    training: RwLock<TrainingStore>,
    stats: Mutex<StatsCollector>,
    monitor: RealTimeMonitor,
    sink: Option<Arc<dyn EventSink>>,
}

impl AnalysisEngine {
    /// Create an engine with the given configuration
    ///
    /// # Returns
    /// * `Ok(AnalysisEngine)` - Ready to analyze
    /// * `Err(ConfigError)` - The configuration is invalid
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        Self::build(config, None)
    }

    /// Create an engine that reports events to the given sink
    pub fn with_event_sink(
        config: AnalysisConfig,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, ConfigError> {
        Self::build(config, Some(sink))
    }

    fn build(
        config: AnalysisConfig,
        sink: Option<Arc<dyn EventSink>>,
    ) -> Result<Self, ConfigError> {
        config.validate().map_err(|err| {
            log_config_error(&err, "engine construction");
            err
        })?;

        let extractor = Arc::new(FeatureExtractor::new(&config));
        let history = FeatureHistory::new(config.history_capacity);
        let training = TrainingStore::new(config.training_capacity);

        Ok(Self {
            active: RwLock::new(ActiveConfig { config, extractor }),
            history: Mutex::new(history),
            training: RwLock::new(training),
            stats: Mutex::new(StatsCollector::default()),
            monitor: RealTimeMonitor::default(),
            sink,
        })
    }

    /// Snapshot of the active configuration
    pub fn config(&self) -> AnalysisConfig {
        match self.active.read() {
            Ok(guard) => guard.config.clone(),
            Err(_) => {
                log::error!("Config lock poisoned in config(), returning defaults");
                AnalysisConfig::default()
            }
        }
    }

    fn active_snapshot(&self) -> (AnalysisConfig, Arc<FeatureExtractor>) {
        match self.active.read() {
            Ok(guard) => (guard.config.clone(), Arc::clone(&guard.extractor)),
            Err(poisoned) => {
                log::error!("Config lock poisoned in active_snapshot, using inner value");
                let guard = poisoned.into_inner();
                (guard.config.clone(), Arc::clone(&guard.extractor))
            }
        }
    }

    /// Analyze one block of audio samples
    ///
    /// Runs the extraction pipeline, blends the result into the smoothed
    /// history, classifies when enabled, and updates monitor and stats.
    /// Malformed input never faults: empty or too-short blocks yield a
    /// zeroed record.
    pub fn analyze(&self, samples: &[f32]) -> FeatureVector {
        let started = Instant::now();
        let (config, extractor) = self.active_snapshot();

        let raw = extractor.extract(samples);

        // Blend against the previous smoothed record; locks cover only the
        // history reads/writes, never the arithmetic
        let previous = match self.history.lock() {
            Ok(guard) => guard.latest(),
            Err(_) => {
                log::error!("History lock poisoned in analyze");
                None
            }
        };
        let smoothed = match previous {
            Some(prev) => history::smooth(&raw, &prev, config.smoothing_alpha),
            None => raw,
        };
        let history_len = match self.history.lock() {
            Ok(mut guard) => {
                guard.push(smoothed);
                guard.len()
            }
            Err(_) => 0,
        };

        let (label, confidence) = if config.enable_classification {
            let result = match self.training.read() {
                Ok(store) => {
                    classifier::classify(&smoothed, &store, config.knn_k, config.nyquist())
                }
                Err(_) => {
                    log::error!("Training store lock poisoned in analyze");
                    ClassificationResult::unknown()
                }
            };
            if let Ok(mut stats) = self.stats.lock() {
                stats.record_classification(result.label);
            }
            (result.label, result.confidence)
        } else {
            (SoundClass::Unknown, 0.0)
        };

        let latency_ms = started.elapsed().as_secs_f32() * 1000.0;
        if let Ok(mut stats) = self.stats.lock() {
            stats.record_block(latency_ms);
        }
        self.monitor.observe_latency(latency_ms);
        self.monitor.publish(RealTimeMetrics {
            centroid: smoothed.centroid,
            rms: smoothed.rms,
            pitch_hz: smoothed.pitch_hz,
            label,
            confidence,
            history_len,
            latency_ms,
        });

        tracing::trace!(
            "[AnalysisEngine] block analyzed: centroid {:.1} Hz, rms {:.4}, {:.3} ms",
            smoothed.centroid,
            smoothed.rms,
            latency_ms
        );

        smoothed
    }

    /// Classify a feature record with the strategy ensemble
    ///
    /// Returns the degraded Unknown result when classification is disabled.
    pub fn classify(&self, features: &FeatureVector) -> ClassificationResult {
        let (config, _) = self.active_snapshot();
        if !config.enable_classification {
            return ClassificationResult::unknown();
        }

        let result = match self.training.read() {
            Ok(store) => classifier::classify(features, &store, config.knn_k, config.nyquist()),
            Err(_) => {
                log::error!("Training store lock poisoned in classify");
                ClassificationResult::unknown()
            }
        };

        if let Ok(mut stats) = self.stats.lock() {
            stats.record_classification(result.label);
        }
        result
    }

    /// Detect the fundamental frequency of a block
    ///
    /// Soft edge cases match the extraction pipeline: silence and too-short
    /// blocks return 0 Hz.
    pub fn detect_pitch(&self, samples: &[f32]) -> f32 {
        let (config, _) = self.active_snapshot();
        PitchDetector::new(config.sample_rate).detect(samples)
    }

    /// Store one labeled example for the nearest-neighbor strategy
    ///
    /// A no-op while learning is disabled. There is no retraining step; the
    /// stored examples are the model.
    pub fn learn_from_feedback(&self, features: &FeatureVector, label: SoundClass) {
        let (config, _) = self.active_snapshot();
        if !config.enable_learning {
            log::debug!("Feedback ignored: learning disabled");
            return;
        }

        let stored = match self.training.write() {
            Ok(mut store) => {
                store.push(*features, label);
                store.len()
            }
            Err(_) => {
                log::error!("Training store lock poisoned in learn_from_feedback");
                return;
            }
        };

        if let Some(sink) = &self.sink {
            sink.record_event(
                "learning",
                &format!("stored {:?} example ({} held)", label, stored),
            );
        }
    }

    /// Copy of the latest monitoring snapshot
    pub fn snapshot(&self) -> RealTimeMetrics {
        self.monitor.snapshot()
    }

    /// Enable or disable monitoring snapshot publication
    ///
    /// Analysis always runs regardless; this only gates publication.
    pub fn set_monitoring(&self, enabled: bool) {
        self.monitor.set_enabled(enabled);
        if let Some(sink) = &self.sink {
            sink.record_event(
                "monitor",
                if enabled { "enabled" } else { "disabled" },
            );
        }
    }

    /// Copy of the collected statistics
    pub fn stats(&self) -> AnalysisStats {
        let training_len = match self.training.read() {
            Ok(store) => store.len(),
            Err(_) => 0,
        };
        match self.stats.lock() {
            Ok(stats) => stats.snapshot(training_len),
            Err(_) => {
                log::error!("Stats lock poisoned in stats()");
                StatsCollector::default().snapshot(training_len)
            }
        }
    }

    /// Replace the active configuration
    ///
    /// Validates first; a rejected configuration leaves the previous one in
    /// effect. On success the extractor is rebuilt and the history and
    /// training capacities are re-applied. Stored records keep their fixed
    /// shape across any change, so both buffers are retained.
    pub fn set_config(&self, config: AnalysisConfig) -> Result<(), ConfigError> {
        config.validate().map_err(|err| {
            log_config_error(&err, "set_config");
            err
        })?;

        // Built outside the lock: extractor construction does real work
        let extractor = Arc::new(FeatureExtractor::new(&config));

        {
            let mut active = match self.active.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            active.config = config.clone();
            active.extractor = extractor;
        }
        if let Ok(mut history) = self.history.lock() {
            history.set_capacity(config.history_capacity);
        }
        if let Ok(mut training) = self.training.write() {
            training.set_capacity(config.training_capacity);
        }

        tracing::info!(
            "[AnalysisEngine] config applied: {} Hz, frame {}, hop {}, {:?} window",
            config.sample_rate,
            config.frame_size,
            config.hop_size,
            config.window
        );
        if let Some(sink) = &self.sink {
            sink.record_event("config", "configuration applied");
        }
        Ok(())
    }

    /// Persist the training store to a JSON file
    pub fn save_training<P: AsRef<Path>>(&self, path: P) -> Result<(), TrainingError> {
        // Serialize under the read lock, write the file outside it
        let json = match self.training.read() {
            Ok(store) => serde_json::to_string(&*store)?,
            Err(_) => {
                log::error!("Training store lock poisoned in save_training");
                return Ok(());
            }
        };
        std::fs::write(path, json)?;

        if let Some(sink) = &self.sink {
            sink.record_event("training", "training set saved");
        }
        Ok(())
    }

    /// Restore the training store from a JSON file
    ///
    /// The loaded store is re-trimmed to the active training capacity.
    pub fn load_training<P: AsRef<Path>>(&self, path: P) -> Result<(), TrainingError> {
        let mut loaded = TrainingStore::load_from_file(path)?;
        let capacity = self.config().training_capacity;
        loaded.set_capacity(capacity);

        if let Ok(mut store) = self.training.write() {
            *store = loaded;
        }
        if let Some(sink) = &self.sink {
            sink.record_event("training", "training set loaded");
        }
        Ok(())
    }
}
