// Sonoscope - real-time audio feature extraction and sound classification
//
// A synchronous analysis engine for audio-callback threads: fixed-shape
// spectral/temporal/harmonic/perceptual descriptors per block, exponential
// smoothing with a bounded history, and a non-parametric three-strategy
// classification ensemble with online feedback learning.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod monitor;
pub mod stats;

// Re-exports for convenience
pub use analysis::classifier::{ClassificationResult, SoundClass};
pub use analysis::features::FeatureVector;
pub use analysis::window::WindowKind;
pub use config::AnalysisConfig;
pub use engine::AnalysisEngine;
pub use error::{ConfigError, TrainingError};
pub use events::{EventSink, LogSink};
pub use monitor::RealTimeMetrics;
pub use stats::AnalysisStats;
