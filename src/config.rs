//! Configuration management for the analysis engine
//!
//! Runtime configuration can be loaded from JSON files for fast iteration
//! without recompilation. A configuration is validated before it is applied;
//! the engine keeps its previous configuration when validation fails.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::analysis::window::WindowKind;
use crate::error::ConfigError;

/// Complete analysis configuration
///
/// Applied atomically at call boundaries: an in-flight analysis always
/// completes with the configuration snapshot captured at its start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Audio sample rate in Hz
    pub sample_rate: u32,
    /// Analysis frame size in samples
    pub frame_size: usize,
    /// Hop between successive frames in samples; must not exceed frame_size
    pub hop_size: usize,
    /// Analysis window shape
    pub window: WindowKind,
    /// Compute mel cepstral coefficients
    pub enable_mfcc: bool,
    /// Compute the pitch-class energy vector
    pub enable_chroma: bool,
    /// Run fundamental detection and harmonic analysis
    pub enable_pitch: bool,
    /// Run the classification ensemble after extraction
    pub enable_classification: bool,
    /// Accept feedback examples into the training store
    pub enable_learning: bool,
    /// Exponential smoothing coefficient in [0, 1]; 1 disables smoothing
    pub smoothing_alpha: f32,
    /// Capacity of the smoothed-feature history buffer
    pub history_capacity: usize,
    /// Capacity of the training store
    pub training_capacity: usize,
    /// Neighbors consulted by the nearest-neighbor strategy
    pub knn_k: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            frame_size: 2048,
            hop_size: 512,
            window: WindowKind::Hann,
            enable_mfcc: true,
            enable_chroma: true,
            enable_pitch: true,
            enable_classification: true,
            enable_learning: true,
            smoothing_alpha: 0.3,
            history_capacity: 100,
            training_capacity: 1000,
            knn_k: 5,
        }
    }
}

impl AnalysisConfig {
    /// Validate the configuration
    ///
    /// # Returns
    /// * `Ok(())` - Configuration is usable
    /// * `Err(ConfigError)` - First violated invariant
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_size == 0 {
            return Err(ConfigError::ZeroFrameSize);
        }
        if self.hop_size > self.frame_size {
            return Err(ConfigError::HopExceedsFrame {
                hop_size: self.hop_size,
                frame_size: self.frame_size,
            });
        }
        if !(0.0..=1.0).contains(&self.smoothing_alpha) || !self.smoothing_alpha.is_finite() {
            return Err(ConfigError::AlphaOutOfRange {
                alpha: self.smoothing_alpha,
            });
        }
        if self.knn_k == 0 {
            return Err(ConfigError::ZeroNeighborCount);
        }
        Ok(())
    }

    /// Half the sample rate, in Hz
    pub fn nyquist(&self) -> f32 {
        self.sample_rate as f32 / 2.0
    }

    /// Load configuration from a JSON file
    ///
    /// Falls back to defaults when the file is missing or malformed; a
    /// config that parses but fails validation also falls back.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<AnalysisConfig>(&contents) {
                Ok(config) => {
                    if let Err(err) = config.validate() {
                        log::warn!(
                            "[Config] {:?} holds an invalid configuration: {}. Using defaults.",
                            path.as_ref(),
                            err
                        );
                        return Self::default();
                    }
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.frame_size, 2048);
        assert_eq!(config.training_capacity, 1000);
        assert_eq!(config.knn_k, 5);
    }

    #[test]
    fn test_hop_exceeding_frame_rejected() {
        let config = AnalysisConfig {
            frame_size: 1024,
            hop_size: 2048,
            ..AnalysisConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::HopExceedsFrame {
                hop_size: 2048,
                frame_size: 1024,
            })
        );
    }

    #[test]
    fn test_zero_frame_rejected() {
        let config = AnalysisConfig {
            frame_size: 0,
            hop_size: 0,
            ..AnalysisConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFrameSize));
    }

    #[test]
    fn test_alpha_out_of_range_rejected() {
        for alpha in [-0.1, 1.5, f32::NAN] {
            let config = AnalysisConfig {
                smoothing_alpha: alpha,
                ..AnalysisConfig::default()
            };
            assert!(config.validate().is_err(), "alpha {} accepted", alpha);
        }
    }

    #[test]
    fn test_json_round_trip() {
        let config = AnalysisConfig {
            window: WindowKind::Blackman,
            enable_chroma: false,
            ..AnalysisConfig::default()
        };
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AnalysisConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.window, WindowKind::Blackman);
        assert!(!parsed.enable_chroma);
        assert_eq!(parsed.frame_size, config.frame_size);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AnalysisConfig::load_from_file("/nonexistent/sonoscope_config.json");
        assert_eq!(config.frame_size, AnalysisConfig::default().frame_size);
    }
}
