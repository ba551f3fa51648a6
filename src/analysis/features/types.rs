// Types module - the fixed-shape feature record
//
// One FeatureVector is produced per analyzed block. The shape never varies:
// disabled feature groups are zeroed, array fields have fixed lengths. A
// returned vector is immutable; history and the training store keep copies,
// never references.

use super::chroma::NUM_CLASSES;
use super::mfcc::NUM_COEFFICIENTS;

/// Descriptors extracted from one audio block
///
/// Groups: spectral shape, mel cepstrum, pitch-class energy, temporal
/// statistics, harmonic content, and perceptual scalars derived from the
/// others.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeatureVector {
    /// Spectral centroid in Hz (energy-weighted mean frequency)
    pub centroid: f32,

    /// Spectral rolloff in Hz (85% energy threshold)
    pub rolloff: f32,

    /// Spectral flatness (0 = tonal, 1 = noise-like)
    pub flatness: f32,

    /// Spectral bandwidth in Hz (energy-weighted spread around the centroid)
    pub bandwidth: f32,

    /// Mel-frequency cepstral coefficients, zeroed when MFCC is disabled
    pub mfcc: [f32; NUM_COEFFICIENTS],

    /// Pitch-class energy distribution, zeroed when chroma is disabled
    pub chroma: [f32; NUM_CLASSES],

    /// Zero-crossing rate (0.0 to 1.0)
    pub zcr: f32,

    /// Block energy (sum of squared samples)
    pub energy: f32,

    /// RMS level
    pub rms: f32,

    /// Amplitude variance (second central moment)
    pub variance: f32,

    /// Fundamental frequency in Hz, 0 when no pitch was found
    pub pitch_hz: f32,

    /// Share of spectral energy at harmonics of the fundamental (0 to 1)
    pub harmonic_ratio: f32,

    /// Centroid normalized by Nyquist (0 to 1)
    pub brightness: f32,

    /// 1 - brightness
    pub warmth: f32,

    /// 1 - flatness
    pub clarity: f32,

    /// Bandwidth over centroid, 0 when the centroid is 0
    pub roughness: f32,

    /// Alias of the harmonic ratio
    pub richness: f32,
}

impl FeatureVector {
    /// The all-zero record returned for empty or too-short input
    pub fn zeroed() -> Self {
        Self {
            centroid: 0.0,
            rolloff: 0.0,
            flatness: 0.0,
            bandwidth: 0.0,
            mfcc: [0.0; NUM_COEFFICIENTS],
            chroma: [0.0; NUM_CLASSES],
            zcr: 0.0,
            energy: 0.0,
            rms: 0.0,
            variance: 0.0,
            pitch_hz: 0.0,
            harmonic_ratio: 0.0,
            brightness: 0.0,
            warmth: 0.0,
            clarity: 0.0,
            roughness: 0.0,
            richness: 0.0,
        }
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::zeroed()
    }
}
