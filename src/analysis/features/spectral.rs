// Spectral module - frequency-domain feature extraction
//
// Computes spectral descriptors from magnitude spectra. Energy weighting
// uses squared magnitudes throughout.
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

/// Spectral rolloff threshold (85% of spectral energy)
const ROLLOFF_THRESHOLD: f32 = 0.85;

/// Spectral feature computation functions
pub struct SpectralFeatures {
    sample_rate: u32,
    fft_size: usize,
}

impl SpectralFeatures {
    /// Create a new spectral features processor
    ///
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `fft_size` - Padded FFT size the spectrum was computed with
    pub fn new(sample_rate: u32, fft_size: usize) -> Self {
        Self {
            sample_rate,
            fft_size,
        }
    }

    fn bin_width(&self) -> f32 {
        self.sample_rate as f32 / self.fft_size as f32
    }

    /// Compute spectral centroid (energy-weighted mean frequency)
    ///
    /// Formula: centroid = Σ(f_i × |X[i]|²) / Σ|X[i]|²
    ///
    /// # Returns
    /// Centroid in Hz, 0 for a silent spectrum
    pub fn compute_centroid(&self, spectrum: &[f32]) -> f32 {
        let bin_width = self.bin_width();

        let mut weighted_sum = 0.0;
        let mut energy_sum = 0.0;
        for (i, &mag) in spectrum.iter().enumerate() {
            let energy = mag * mag;
            weighted_sum += i as f32 * bin_width * energy;
            energy_sum += energy;
        }

        if energy_sum > 1e-10 {
            weighted_sum / energy_sum
        } else {
            0.0
        }
    }

    /// Compute spectral rolloff (85% energy threshold frequency)
    ///
    /// Finds the first frequency bin whose cumulative energy reaches 85% of
    /// the total spectral energy.
    ///
    /// # Returns
    /// Rolloff frequency in Hz, 0 for a silent spectrum
    pub fn compute_rolloff(&self, spectrum: &[f32]) -> f32 {
        let total_energy: f32 = spectrum.iter().map(|&mag| mag * mag).sum();
        if total_energy < 1e-10 {
            return 0.0;
        }

        let threshold = ROLLOFF_THRESHOLD * total_energy;
        let bin_width = self.bin_width();

        let mut cumulative = 0.0;
        for (i, &mag) in spectrum.iter().enumerate() {
            cumulative += mag * mag;
            if cumulative >= threshold {
                return i as f32 * bin_width;
            }
        }

        (spectrum.len() - 1) as f32 * bin_width
    }

    /// Compute spectral flatness (tonality measure)
    ///
    /// Formula: flatness = geometric_mean(|X[i]|) / arithmetic_mean(|X[i]|)
    ///
    /// Returns a value between 0 (tonal) and 1 (noise-like). Zero and
    /// near-zero bins are excluded from the geometric mean.
    pub fn compute_flatness(&self, spectrum: &[f32]) -> f32 {
        let non_zero: Vec<f32> = spectrum
            .iter()
            .filter(|&&mag| mag > 1e-10)
            .copied()
            .collect();

        if non_zero.is_empty() {
            return 0.0;
        }

        let log_sum: f32 = non_zero.iter().map(|&mag| mag.ln()).sum();
        let geometric_mean = (log_sum / non_zero.len() as f32).exp();
        let arithmetic_mean: f32 = non_zero.iter().sum::<f32>() / non_zero.len() as f32;

        if arithmetic_mean > 1e-10 {
            (geometric_mean / arithmetic_mean).min(1.0)
        } else {
            0.0
        }
    }

    /// Compute spectral bandwidth (energy-weighted spread around the centroid)
    ///
    /// Formula: bandwidth = Σ(|f_i − centroid| × |X[i]|²) / Σ|X[i]|²
    ///
    /// # Returns
    /// Bandwidth in Hz, 0 for a silent spectrum
    pub fn compute_bandwidth(&self, spectrum: &[f32], centroid: f32) -> f32 {
        let bin_width = self.bin_width();

        let mut weighted_sum = 0.0;
        let mut energy_sum = 0.0;
        for (i, &mag) in spectrum.iter().enumerate() {
            let energy = mag * mag;
            weighted_sum += (i as f32 * bin_width - centroid).abs() * energy;
            energy_sum += energy;
        }

        if energy_sum > 1e-10 {
            weighted_sum / energy_sum
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_bin_spectrum(len: usize, bin: usize) -> Vec<f32> {
        let mut spectrum = vec![0.0; len];
        spectrum[bin] = 1.0;
        spectrum
    }

    #[test]
    fn test_centroid_single_bin() {
        let features = SpectralFeatures::new(48000, 1024);
        let spectrum = single_bin_spectrum(513, 100);

        let centroid = features.compute_centroid(&spectrum);
        let expected = 100.0 * 48000.0 / 1024.0;
        assert!(
            (centroid - expected).abs() < 1.0,
            "centroid {} != {}",
            centroid,
            expected
        );
    }

    #[test]
    fn test_centroid_silent_spectrum() {
        let features = SpectralFeatures::new(48000, 1024);
        let spectrum = vec![0.0; 513];
        assert_eq!(features.compute_centroid(&spectrum), 0.0);
    }

    #[test]
    fn test_rolloff_is_first_85_percent_bin() {
        let features = SpectralFeatures::new(1024, 1024);
        // Equal-energy bins: cumulative hits 85% of 100 bins at bin 84
        let spectrum = vec![1.0; 100];
        let rolloff = features.compute_rolloff(&spectrum);

        let bin_width = 1.0;
        assert_eq!(rolloff, 84.0 * bin_width);
    }

    #[test]
    fn test_rolloff_silent_spectrum() {
        let features = SpectralFeatures::new(48000, 1024);
        assert_eq!(features.compute_rolloff(&[0.0; 64]), 0.0);
    }

    #[test]
    fn test_flatness_flat_vs_peaked() {
        let features = SpectralFeatures::new(48000, 1024);

        let flat = vec![0.5; 257];
        assert!((features.compute_flatness(&flat) - 1.0).abs() < 1e-4);

        let mut peaked = vec![1e-8; 257];
        peaked[40] = 1.0;
        assert!(features.compute_flatness(&peaked) < 0.1);
    }

    #[test]
    fn test_bandwidth_concentrated_vs_spread() {
        let features = SpectralFeatures::new(1024, 1024);

        let concentrated = single_bin_spectrum(513, 60);
        let centroid = features.compute_centroid(&concentrated);
        assert!(features.compute_bandwidth(&concentrated, centroid) < 1e-3);

        let mut spread = vec![0.0; 513];
        spread[10] = 1.0;
        spread[110] = 1.0;
        let centroid = features.compute_centroid(&spread);
        let bandwidth = features.compute_bandwidth(&spread, centroid);
        assert!(
            (bandwidth - 50.0).abs() < 0.5,
            "two equal bins 100 apart should spread 50 each side, got {}",
            bandwidth
        );
    }
}
