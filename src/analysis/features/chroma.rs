// Chroma module - octave-folded pitch-class energy
//
// Each spectrum bin's energy is folded onto one of 12 semitone classes via
// pitch class = (round(12 * log2(f / 440)) + 57) mod 12, which maps A4 to
// class 9 (A) with C at class 0. The vector is normalized to unit sum.

/// Number of pitch classes
pub const NUM_CLASSES: usize = 12;

/// Chroma vector computation over a fixed transform geometry
pub struct ChromaFeatures {
    sample_rate: u32,
    fft_size: usize,
}

impl ChromaFeatures {
    /// Create a new chroma processor
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

    /// Fold a magnitude spectrum into 12 pitch classes
    ///
    /// Bin 0 (DC) is skipped. Returns an all-zero vector for a silent
    /// spectrum, otherwise the class energies normalized to sum 1.
    pub fn compute(&self, spectrum: &[f32]) -> [f32; NUM_CLASSES] {
        let bin_width = self.sample_rate as f32 / self.fft_size as f32;
        let mut classes = [0.0f32; NUM_CLASSES];

        for (i, &mag) in spectrum.iter().enumerate().skip(1) {
            let freq = i as f32 * bin_width;
            if freq <= 0.0 {
                continue;
            }
            let semitone = 12.0 * (freq / 440.0).log2();
            let class = (semitone.round() as i64 + 57).rem_euclid(12) as usize;
            classes[class] += mag * mag;
        }

        let total: f32 = classes.iter().sum();
        if total > 1e-10 {
            for c in classes.iter_mut() {
                *c /= total;
            }
        }
        classes
    }
}
