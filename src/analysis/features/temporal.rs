// Temporal module - time-domain feature extraction
//
// Computes features directly from the windowed time-domain block: sign
// changes, energy, RMS level, and amplitude variance.

/// Compute zero-crossing rate
///
/// Formula: ZCR = sign changes / block length
///
/// High ZCR indicates high-frequency or noise-like content, low ZCR
/// indicates low-frequency or tonal content.
///
/// # Returns
/// Zero-crossing rate (0.0 to 1.0)
pub fn compute_zcr(audio: &[f32]) -> f32 {
    if audio.len() < 2 {
        return 0.0;
    }

    let mut crossings = 0;
    for i in 1..audio.len() {
        if (audio[i] >= 0.0 && audio[i - 1] < 0.0) || (audio[i] < 0.0 && audio[i - 1] >= 0.0) {
            crossings += 1;
        }
    }

    crossings as f32 / audio.len() as f32
}

/// Compute block energy (sum of squared samples)
pub fn compute_energy(audio: &[f32]) -> f32 {
    audio.iter().map(|&x| x * x).sum()
}

/// Compute RMS level
///
/// Formula: RMS = sqrt(energy / length). Exactly 0 for an empty or
/// all-zero block.
pub fn compute_rms(audio: &[f32]) -> f32 {
    if audio.is_empty() {
        return 0.0;
    }
    (compute_energy(audio) / audio.len() as f32).sqrt()
}

/// Compute amplitude variance (second central moment)
pub fn compute_variance(audio: &[f32]) -> f32 {
    if audio.is_empty() {
        return 0.0;
    }

    let mean: f32 = audio.iter().sum::<f32>() / audio.len() as f32;
    audio.iter().map(|&x| (x - mean) * (x - mean)).sum::<f32>() / audio.len() as f32
}
