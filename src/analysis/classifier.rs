// Classifier - non-parametric sound category voting
//
// Three independent strategies each map a feature record to a coarse sound
// category: nearest-neighbor lookup against the training store, a fixed
// rule-threshold table, and a weighted feature score. A pure majority
// combiner turns the three votes into a label with vote-fraction
// confidence. There is no trained model anywhere in this path.
//
// Ties are resolved by a fixed priority: the declaration order of
// SoundClass, with Unknown last. The same order drives the probability
// list, so results are deterministic across runs.

use crate::analysis::features::FeatureVector;
use crate::analysis::training::TrainingStore;

/// Coarse sound categories
///
/// Declaration order doubles as the deterministic tie-break priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SoundClass {
    /// Low-register tonal content
    Bass,
    /// Percussive, transient-heavy content
    Drum,
    /// Sustained mid-band texture
    Pad,
    /// Bright, energetic melodic content
    Lead,
    /// Bright content without sustained energy
    Speech,
    /// No stable category
    Unknown,
}

impl SoundClass {
    /// All classes in tie-break priority order
    pub const ALL: [SoundClass; 6] = [
        SoundClass::Bass,
        SoundClass::Drum,
        SoundClass::Pad,
        SoundClass::Lead,
        SoundClass::Speech,
        SoundClass::Unknown,
    ];

    /// Position in the tie-break order
    fn priority(self) -> usize {
        Self::ALL.iter().position(|&c| c == self).unwrap_or(usize::MAX)
    }

    /// Short human-readable description of the category
    pub fn describe(self) -> &'static str {
        match self {
            SoundClass::Bass => "low-register tonal content",
            SoundClass::Drum => "percussive transient content",
            SoundClass::Pad => "sustained mid-band texture",
            SoundClass::Lead => "bright energetic melodic content",
            SoundClass::Speech => "bright content without sustained energy",
            SoundClass::Unknown => "no stable category",
        }
    }
}

/// Outcome of one ensemble classification
///
/// Created per call and handed to the caller; the engine retains nothing.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ClassificationResult {
    /// Winning category
    pub label: SoundClass,
    /// Vote fraction for the winner: 1/3, 2/3 or 1; 0 when degraded
    pub confidence: f32,
    /// Vote share per category, descending, summing to 1
    pub probabilities: Vec<(SoundClass, f32)>,
    /// Free-text summary of the outcome
    pub description: String,
}

impl ClassificationResult {
    /// The degraded result used when classification cannot run
    pub fn unknown() -> Self {
        Self {
            label: SoundClass::Unknown,
            confidence: 0.0,
            probabilities: vec![(SoundClass::Unknown, 1.0)],
            description: format!("Unknown: {}", SoundClass::Unknown.describe()),
        }
    }
}

/// Number of nearest neighbors consulted by default
pub const DEFAULT_K: usize = 5;

/// The feature subset the nearest-neighbor distance is computed over
fn distance_features(features: &FeatureVector) -> [f32; 5] {
    [
        features.centroid,
        features.rolloff,
        features.flatness,
        features.energy,
        features.rms,
    ]
}

fn euclidean(a: &[f32; 5], b: &[f32; 5]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Nearest-neighbor strategy
///
/// Majority label among the k closest stored examples by Euclidean
/// distance over {centroid, rolloff, flatness, energy, rms}. Returns
/// Unknown while the store holds fewer than k examples.
pub fn nearest_neighbor_vote(
    features: &FeatureVector,
    store: &TrainingStore,
    k: usize,
) -> SoundClass {
    if k == 0 || store.len() < k {
        return SoundClass::Unknown;
    }

    let query = distance_features(features);
    let mut neighbors: Vec<(f32, SoundClass)> = store
        .iter()
        .map(|example| {
            (
                euclidean(&query, &distance_features(&example.features)),
                example.label,
            )
        })
        .collect();
    neighbors.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut tally = [0usize; SoundClass::ALL.len()];
    for &(_, label) in neighbors.iter().take(k) {
        tally[label.priority()] += 1;
    }
    winner_of(&tally)
}

/// Rule-threshold strategy
///
/// Fixed bands over centroid, energy and zero-crossing rate.
pub fn rule_threshold_vote(features: &FeatureVector) -> SoundClass {
    if features.centroid > 2000.0 {
        if features.energy > 0.1 {
            SoundClass::Lead
        } else {
            SoundClass::Speech
        }
    } else if features.centroid > 1000.0 {
        SoundClass::Pad
    } else if features.zcr > 0.1 {
        SoundClass::Drum
    } else {
        SoundClass::Bass
    }
}

/// Weighted-score strategy
///
/// score = 0.3·brightness + 0.2·energy + 0.3·harmonic ratio +
/// 0.2·(1 − flatness), with the centroid normalized by Nyquist and the
/// energy term clamped to 1, then mapped over fixed score bands.
pub fn weighted_score_vote(features: &FeatureVector, nyquist: f32) -> SoundClass {
    let norm_centroid = if nyquist > 0.0 {
        (features.centroid / nyquist).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let score = 0.3 * norm_centroid
        + 0.2 * features.energy.clamp(0.0, 1.0)
        + 0.3 * features.harmonic_ratio.clamp(0.0, 1.0)
        + 0.2 * (1.0 - features.flatness).clamp(0.0, 1.0);

    if score >= 0.75 {
        SoundClass::Lead
    } else if score >= 0.5 {
        SoundClass::Pad
    } else if score >= 0.35 {
        SoundClass::Speech
    } else if score >= 0.2 {
        SoundClass::Drum
    } else {
        SoundClass::Bass
    }
}

/// Highest-voted class; ties go to the earlier declaration
fn winner_of(tally: &[usize; SoundClass::ALL.len()]) -> SoundClass {
    let mut winner = SoundClass::Unknown;
    let mut best = 0usize;
    for (i, &votes) in tally.iter().enumerate() {
        if votes > best {
            best = votes;
            winner = SoundClass::ALL[i];
        }
    }
    winner
}

/// Run all three strategies and combine their votes
///
/// Confidence is the winner's vote fraction; the probability list carries
/// every voted class in descending share. An all-Unknown outcome (possible
/// only through degradation) reports confidence 0.
pub fn classify(
    features: &FeatureVector,
    store: &TrainingStore,
    k: usize,
    nyquist: f32,
) -> ClassificationResult {
    let votes = [
        nearest_neighbor_vote(features, store, k),
        rule_threshold_vote(features),
        weighted_score_vote(features, nyquist),
    ];

    let mut tally = [0usize; SoundClass::ALL.len()];
    for vote in votes {
        tally[vote.priority()] += 1;
    }

    let label = winner_of(&tally);
    let winner_votes = tally[label.priority()];
    let confidence = if label == SoundClass::Unknown {
        0.0
    } else {
        winner_votes as f32 / votes.len() as f32
    };

    let mut probabilities: Vec<(SoundClass, f32)> = tally
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(i, &count)| (SoundClass::ALL[i], count as f32 / votes.len() as f32))
        .collect();
    probabilities.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.priority().cmp(&b.0.priority()))
    });

    let description = format!(
        "{:?}: {} ({} of {} strategies agree)",
        label,
        label.describe(),
        winner_votes,
        votes.len()
    );

    ClassificationResult {
        label,
        confidence,
        probabilities,
        description,
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
