// Window functions - deterministic coefficient sequences for analysis frames
//
// Windowing reduces spectral leakage before the FFT. Coefficients are
// generated once per (size, kind) pair and cached, since frame size and
// window kind only change on reconfiguration, never per block.

use std::collections::HashMap;
use std::f32::consts::PI;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

/// Cached coefficient tables keyed by (size, kind).
static WINDOW_CACHE: Lazy<Mutex<HashMap<(usize, WindowKind), Arc<Vec<f32>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Supported analysis window shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    /// All-ones window (no tapering)
    Rectangular,
    /// Raised cosine, zero at both endpoints
    Hann,
    /// Raised cosine on a 0.08 pedestal
    Hamming,
    /// Two-term raised cosine with stronger sidelobe suppression
    Blackman,
}

/// Generate window coefficients for the given size and kind
///
/// Every coefficient lies in [0, 1]. Results are cached; repeated calls with
/// the same (size, kind) return the same shared table.
///
/// # Arguments
/// * `size` - Window length in samples
/// * `kind` - Window shape
pub fn generate(size: usize, kind: WindowKind) -> Arc<Vec<f32>> {
    let mut cache = match WINDOW_CACHE.lock() {
        Ok(guard) => guard,
        Err(_) => {
            // Cache lock poisoned - fall back to an uncached table
            log::error!("Window cache lock poisoned, generating uncached coefficients");
            return Arc::new(compute(size, kind));
        }
    };

    cache
        .entry((size, kind))
        .or_insert_with(|| Arc::new(compute(size, kind)))
        .clone()
}

fn compute(size: usize, kind: WindowKind) -> Vec<f32> {
    // Degenerate lengths have no taper to express
    if size <= 1 {
        return vec![1.0; size];
    }

    let denom = (size - 1) as f32;
    match kind {
        WindowKind::Rectangular => vec![1.0; size],
        WindowKind::Hann => (0..size)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / denom).cos()))
            .collect(),
        WindowKind::Hamming => (0..size)
            .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f32 / denom).cos())
            .collect(),
        WindowKind::Blackman => (0..size)
            .map(|i| {
                let phase = 2.0 * PI * i as f32 / denom;
                0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
            })
            .collect(),
    }
}
