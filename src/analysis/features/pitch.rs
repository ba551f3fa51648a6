// Pitch module - autocorrelation fundamental search and harmonic ratio
//
// The fundamental is found by scanning autocorrelation lags covering
// 50 Hz to 2 kHz and taking the lag with the highest normalized
// correlation. Blocks with no clear periodicity report 0 Hz.

/// Minimum normalized correlation for a lag to count as periodic
const CORRELATION_THRESHOLD: f32 = 0.3;

/// Highest harmonic multiple sampled for the harmonic ratio
const MAX_HARMONIC: usize = 10;

/// Pitch detection over a fixed search band
pub struct PitchDetector {
    sample_rate: u32,
}

impl PitchDetector {
    /// Create a new pitch detector
    ///
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Detect the fundamental frequency of a block
    ///
    /// Searches autocorrelation lags in [sample_rate/2000, sample_rate/50],
    /// i.e. fundamentals between 50 Hz and 2 kHz. The block is used
    /// untapered; windowing would bias the lag peak.
    ///
    /// # Returns
    /// Fundamental in Hz, or 0.0 when the block is silent, too short, or
    /// has no lag above the correlation threshold
    pub fn detect(&self, audio: &[f32]) -> f32 {
        let min_lag = (self.sample_rate / 2000).max(1) as usize;
        let max_lag = (self.sample_rate / 50) as usize;
        let max_lag = max_lag.min(audio.len() / 2);

        if max_lag <= min_lag {
            return 0.0;
        }

        let energy: f32 = audio.iter().map(|&x| x * x).sum();
        if energy < 1e-10 {
            return 0.0;
        }

        let mut best_lag = 0usize;
        let mut best_corr = 0.0f32;
        for lag in min_lag..=max_lag {
            let mut corr = 0.0f32;
            for i in 0..audio.len() - lag {
                corr += audio[i] * audio[i + lag];
            }
            let normalized = corr / energy;
            if normalized > best_corr {
                best_corr = normalized;
                best_lag = lag;
            }
        }

        if best_corr > CORRELATION_THRESHOLD && best_lag > 0 {
            self.sample_rate as f32 / best_lag as f32
        } else {
            0.0
        }
    }

    /// Compute the harmonic ratio of a magnitude spectrum
    ///
    /// Sums the energy at integer multiples of the fundamental bin (up to
    /// the 10th) and divides by total spectral energy.
    ///
    /// # Arguments
    /// * `spectrum` - Magnitude spectrum (positive frequencies)
    /// * `fundamental_hz` - Detected fundamental, 0 yields ratio 0
    /// * `fft_size` - Padded FFT size the spectrum was computed with
    ///
    /// # Returns
    /// Harmonic ratio in [0, 1]
    pub fn harmonic_ratio(&self, spectrum: &[f32], fundamental_hz: f32, fft_size: usize) -> f32 {
        if fundamental_hz <= 0.0 || spectrum.is_empty() {
            return 0.0;
        }

        let total_energy: f32 = spectrum.iter().map(|&mag| mag * mag).sum();
        if total_energy < 1e-10 {
            return 0.0;
        }

        let fundamental_bin = fundamental_hz * fft_size as f32 / self.sample_rate as f32;
        let mut harmonic_energy = 0.0f32;
        for harmonic in 1..=MAX_HARMONIC {
            let bin = (fundamental_bin * harmonic as f32).round() as usize;
            if bin >= spectrum.len() {
                break;
            }
            harmonic_energy += spectrum[bin] * spectrum[bin];
        }

        (harmonic_energy / total_energy).clamp(0.0, 1.0)
    }
}
