// FFT module - spectral transform with power-of-two zero padding
//
// Wraps rustfft behind a forward/inverse pair. Inputs are zero-padded to the
// next power of two so callers can hand in arbitrary block lengths. The
// inverse applies 1/N normalization so inverse(forward(x)) reproduces the
// padded input.

use rustfft::{num_complex::Complex, FftPlanner};
use std::sync::Mutex;

/// Spectral transform between real sample blocks and complex bins
pub struct SpectralTransform {
    planner: Mutex<FftPlanner<f32>>,
}

impl SpectralTransform {
    pub fn new() -> Self {
        Self {
            planner: Mutex::new(FftPlanner::new()),
        }
    }

    /// Smallest power of two that holds `len` samples
    pub fn padded_len(len: usize) -> usize {
        len.max(1).next_power_of_two()
    }

    /// Forward transform of a real sample block
    ///
    /// The input is zero-padded to the next power of two. Returns the full
    /// complex bin vector of that padded length.
    pub fn forward(&self, samples: &[f32]) -> Vec<Complex<f32>> {
        let size = Self::padded_len(samples.len());
        let mut buffer: Vec<Complex<f32>> = samples
            .iter()
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(size, Complex::new(0.0, 0.0));

        let fft = {
            let mut planner = self.planner.lock().expect("fft planner poisoned");
            planner.plan_fft_forward(size)
        };
        fft.process(&mut buffer);
        buffer
    }

    /// Inverse transform back to a real sample block
    ///
    /// Returns `bins.len()` samples with 1/N normalization applied, so a
    /// forward/inverse round trip reproduces the padded input.
    pub fn inverse(&self, bins: &[Complex<f32>]) -> Vec<f32> {
        if bins.is_empty() {
            return Vec::new();
        }

        let size = bins.len();
        let mut buffer = bins.to_vec();

        let fft = {
            let mut planner = self.planner.lock().expect("fft planner poisoned");
            planner.plan_fft_inverse(size)
        };
        fft.process(&mut buffer);

        let scale = 1.0 / size as f32;
        buffer.iter().map(|c| c.re * scale).collect()
    }

    /// Magnitude spectrum for the positive frequencies of a real block
    ///
    /// Returns `padded_len / 2 + 1` magnitudes, exploiting the symmetry of
    /// the real-valued transform.
    pub fn magnitude_spectrum(&self, samples: &[f32]) -> Vec<f32> {
        let bins = self.forward(samples);
        let half = bins.len() / 2 + 1;
        bins[..half].iter().map(|c| c.norm()).collect()
    }
}

impl Default for SpectralTransform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_len_rounds_up() {
        assert_eq!(SpectralTransform::padded_len(0), 1);
        assert_eq!(SpectralTransform::padded_len(1000), 1024);
        assert_eq!(SpectralTransform::padded_len(1024), 1024);
        assert_eq!(SpectralTransform::padded_len(1025), 2048);
    }

    #[test]
    fn test_round_trip_power_of_two() {
        let transform = SpectralTransform::new();
        let signal: Vec<f32> = (0..512)
            .map(|i| {
                let t = i as f32 / 512.0;
                (2.0 * std::f32::consts::PI * 7.0 * t).sin()
                    + 0.25 * (2.0 * std::f32::consts::PI * 31.0 * t).cos()
            })
            .collect();

        let bins = transform.forward(&signal);
        let restored = transform.inverse(&bins);

        assert_eq!(restored.len(), 512);
        let peak = signal.iter().fold(0.0f32, |a, &b| a.max(b.abs()));
        for (i, (&orig, &rest)) in signal.iter().zip(restored.iter()).enumerate() {
            assert!(
                (orig - rest).abs() < 1e-3 * peak.max(1.0),
                "sample {} diverged: {} vs {}",
                i,
                orig,
                rest
            );
        }
    }

    #[test]
    fn test_round_trip_pads_short_input() {
        let transform = SpectralTransform::new();
        let signal = vec![1.0, -1.0, 0.5];
        let bins = transform.forward(&signal);
        assert_eq!(bins.len(), 4);

        let restored = transform.inverse(&bins);
        assert_eq!(restored.len(), 4);
        for (orig, rest) in signal.iter().zip(restored.iter()) {
            assert!((orig - rest).abs() < 1e-4);
        }
        assert!(restored[3].abs() < 1e-4, "padding should restore to zero");
    }

    #[test]
    fn test_magnitude_spectrum_peak_bin() {
        let transform = SpectralTransform::new();
        // Exact bin: 8 cycles in 256 samples
        let signal: Vec<f32> = (0..256)
            .map(|i| (2.0 * std::f32::consts::PI * 8.0 * i as f32 / 256.0).sin())
            .collect();

        let spectrum = transform.magnitude_spectrum(&signal);
        assert_eq!(spectrum.len(), 129);

        let peak_bin = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_bin, 8);
    }
}
