// FeatureExtractor - block-level descriptor extraction pipeline
//
// Coordinates windowing, the spectral transform, and the derived-feature
// formulas into one fixed-shape record per audio block.
//
// Module organization:
// - types: FeatureVector record
// - fft: spectral transform with power-of-two padding
// - spectral: centroid, rolloff, flatness, bandwidth
// - temporal: ZCR, energy, RMS, variance
// - pitch: autocorrelation fundamental + harmonic ratio
// - mfcc: mel filterbank cepstrum
// - chroma: pitch-class energy folding
// - mod.rs: coordinator (FeatureExtractor)
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

pub mod chroma;
pub mod fft;
pub mod mfcc;
pub mod pitch;
pub mod spectral;
pub mod temporal;
mod types;

pub use types::FeatureVector;

use std::sync::Arc;

use crate::analysis::window;
use crate::config::AnalysisConfig;
use chroma::ChromaFeatures;
use fft::SpectralTransform;
use mfcc::MelFilterBank;
use pitch::PitchDetector;
use spectral::SpectralFeatures;

/// Shortest block the pipeline will analyze; anything shorter degrades to a
/// zeroed record instead of an error.
pub const MIN_BLOCK_LEN: usize = 64;

/// FeatureExtractor runs the full per-block extraction pipeline
///
/// One extractor is built per configuration; the window table, transform
/// geometry, and mel filterbank are precomputed so per-block calls stay
/// allocation-light and bounded-time.
pub struct FeatureExtractor {
    sample_rate: u32,
    frame_size: usize,
    fft_size: usize,
    enable_mfcc: bool,
    enable_chroma: bool,
    enable_pitch: bool,
    window: Arc<Vec<f32>>,
    transform: SpectralTransform,
    spectral: SpectralFeatures,
    mel_bank: MelFilterBank,
    chroma: ChromaFeatures,
    pitch: PitchDetector,
}

impl FeatureExtractor {
    /// Build an extractor for the given configuration
    pub fn new(config: &AnalysisConfig) -> Self {
        let fft_size = SpectralTransform::padded_len(config.frame_size);

        Self {
            sample_rate: config.sample_rate,
            frame_size: config.frame_size,
            fft_size,
            enable_mfcc: config.enable_mfcc,
            enable_chroma: config.enable_chroma,
            enable_pitch: config.enable_pitch,
            window: window::generate(config.frame_size, config.window),
            transform: SpectralTransform::new(),
            spectral: SpectralFeatures::new(config.sample_rate, fft_size),
            mel_bank: MelFilterBank::new(config.sample_rate, fft_size),
            chroma: ChromaFeatures::new(config.sample_rate, fft_size),
            pitch: PitchDetector::new(config.sample_rate),
        }
    }

    /// Sample rate the extractor was built for
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Extract all enabled features from an audio block
    ///
    /// Blocks longer than the frame size are truncated to it; shorter blocks
    /// are zero-padded into the transform. Input below MIN_BLOCK_LEN samples
    /// (or with no signal energy) yields a zeroed record.
    pub fn extract(&self, samples: &[f32]) -> FeatureVector {
        if samples.len() < MIN_BLOCK_LEN {
            return FeatureVector::zeroed();
        }

        let take = self.frame_size.min(samples.len());
        let mut windowed: Vec<f32> = Vec::with_capacity(self.frame_size);
        for i in 0..take {
            windowed.push(samples[i] * self.window[i]);
        }
        windowed.resize(self.frame_size, 0.0);

        // Temporal features come straight off the windowed block
        let energy = temporal::compute_energy(&windowed);
        if energy <= 0.0 {
            return FeatureVector::zeroed();
        }
        let zcr = temporal::compute_zcr(&windowed);
        let rms = temporal::compute_rms(&windowed);
        let variance = temporal::compute_variance(&windowed);

        let spectrum = self.transform.magnitude_spectrum(&windowed);

        let centroid = self.spectral.compute_centroid(&spectrum);
        let rolloff = self.spectral.compute_rolloff(&spectrum);
        let flatness = self.spectral.compute_flatness(&spectrum);
        let bandwidth = self.spectral.compute_bandwidth(&spectrum, centroid);

        let mfcc = if self.enable_mfcc {
            self.mel_bank.compute(&spectrum)
        } else {
            [0.0; mfcc::NUM_COEFFICIENTS]
        };

        let chroma = if self.enable_chroma {
            self.chroma.compute(&spectrum)
        } else {
            [0.0; chroma::NUM_CLASSES]
        };

        // Autocorrelation runs on the untapered block; windowing would bias
        // the lag peak
        let (pitch_hz, harmonic_ratio) = if self.enable_pitch {
            let hz = self.pitch.detect(&samples[..take]);
            let ratio = self.pitch.harmonic_ratio(&spectrum, hz, self.fft_size);
            (hz, ratio)
        } else {
            (0.0, 0.0)
        };

        let nyquist = self.sample_rate as f32 / 2.0;
        let brightness = if nyquist > 0.0 {
            (centroid / nyquist).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let roughness = if centroid > 0.0 {
            bandwidth / centroid
        } else {
            0.0
        };

        FeatureVector {
            centroid,
            rolloff,
            flatness,
            bandwidth,
            mfcc,
            chroma,
            zcr,
            energy,
            rms,
            variance,
            pitch_hz,
            harmonic_ratio,
            brightness,
            warmth: 1.0 - brightness,
            clarity: 1.0 - flatness,
            roughness,
            richness: harmonic_ratio,
        }
    }
}
