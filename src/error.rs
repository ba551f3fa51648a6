// Error types for configuration and training-set persistence
//
// The analysis boundary itself never fails: malformed input degrades to a
// zeroed feature vector. The only hard rejections in the engine are invalid
// configurations and training-set file I/O.

use log::error;
use std::fmt;

/// Configuration validation errors
///
/// A rejected configuration leaves the previously active configuration in
/// effect; the engine never runs with a partially applied config.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Hop size exceeds frame size
    HopExceedsFrame { hop_size: usize, frame_size: usize },

    /// Frame size is zero
    ZeroFrameSize,

    /// Smoothing coefficient outside [0, 1]
    AlphaOutOfRange { alpha: f32 },

    /// Nearest-neighbor k is zero
    ZeroNeighborCount,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::HopExceedsFrame {
                hop_size,
                frame_size,
            } => write!(
                f,
                "hop size {} exceeds frame size {}",
                hop_size, frame_size
            ),
            ConfigError::ZeroFrameSize => write!(f, "frame size must be greater than 0"),
            ConfigError::AlphaOutOfRange { alpha } => {
                write!(f, "smoothing alpha {} outside [0, 1]", alpha)
            }
            ConfigError::ZeroNeighborCount => {
                write!(f, "nearest-neighbor k must be greater than 0")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Log a configuration error with structured context
///
/// Non-blocking; never panics.
pub fn log_config_error(err: &ConfigError, context: &str) {
    error!(
        "Config error in {}: component=AnalysisEngine, message={}",
        context, err
    );
}

/// Training-set persistence errors
#[derive(Debug)]
pub enum TrainingError {
    /// File could not be read or written
    Io(std::io::Error),

    /// Stored training set could not be parsed
    Format(serde_json::Error),
}

impl fmt::Display for TrainingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingError::Io(err) => write!(f, "training set I/O failed: {}", err),
            TrainingError::Format(err) => write!(f, "training set format invalid: {}", err),
        }
    }
}

impl std::error::Error for TrainingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrainingError::Io(err) => Some(err),
            TrainingError::Format(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TrainingError {
    fn from(err: std::io::Error) -> Self {
        TrainingError::Io(err)
    }
}

impl From<serde_json::Error> for TrainingError {
    fn from(err: serde_json::Error) -> Self {
        TrainingError::Format(err)
    }
}
