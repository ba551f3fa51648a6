use super::*;
use crate::analysis::features::FeatureVector;
use crate::analysis::training::TrainingStore;

const NYQUIST: f32 = 22050.0;

fn features(centroid: f32, energy: f32, zcr: f32) -> FeatureVector {
    FeatureVector {
        centroid,
        energy,
        zcr,
        rms: (energy / 2048.0).sqrt(),
        ..FeatureVector::zeroed()
    }
}

fn stocked_store(label: SoundClass, centroid: f32, count: usize) -> TrainingStore {
    let mut store = TrainingStore::new(100);
    for i in 0..count {
        store.push(features(centroid + i as f32, 0.5, 0.05), label);
    }
    store
}

#[test]
fn test_rule_threshold_bands() {
    assert_eq!(
        rule_threshold_vote(&features(3000.0, 0.5, 0.05)),
        SoundClass::Lead
    );
    assert_eq!(
        rule_threshold_vote(&features(3000.0, 0.01, 0.05)),
        SoundClass::Speech
    );
    assert_eq!(
        rule_threshold_vote(&features(1500.0, 0.5, 0.05)),
        SoundClass::Pad
    );
    assert_eq!(
        rule_threshold_vote(&features(500.0, 0.5, 0.3)),
        SoundClass::Drum
    );
    assert_eq!(
        rule_threshold_vote(&features(500.0, 0.5, 0.05)),
        SoundClass::Bass
    );
}

#[test]
fn test_weighted_score_extremes() {
    // Bright, energetic, fully harmonic, fully tonal: top band
    let mut high = features(NYQUIST, 1.0, 0.0);
    high.harmonic_ratio = 1.0;
    high.flatness = 0.0;
    assert_eq!(weighted_score_vote(&high, NYQUIST), SoundClass::Lead);

    // Dark, quiet, noisy: bottom band
    let mut low = features(0.0, 0.0, 0.0);
    low.flatness = 1.0;
    assert_eq!(weighted_score_vote(&low, NYQUIST), SoundClass::Bass);
}

#[test]
fn test_nearest_neighbor_undersized_store() {
    let store = stocked_store(SoundClass::Bass, 100.0, 4);
    let vote = nearest_neighbor_vote(&features(100.0, 0.5, 0.05), &store, 5);
    assert_eq!(vote, SoundClass::Unknown);
}

#[test]
fn test_nearest_neighbor_majority() {
    let mut store = TrainingStore::new(100);
    for i in 0..5 {
        store.push(features(200.0 + i as f32, 0.5, 0.02), SoundClass::Bass);
    }
    for i in 0..5 {
        store.push(features(8000.0 + i as f32, 0.5, 0.4), SoundClass::Lead);
    }

    let vote = nearest_neighbor_vote(&features(210.0, 0.5, 0.02), &store, 5);
    assert_eq!(vote, SoundClass::Bass);

    let vote = nearest_neighbor_vote(&features(7990.0, 0.5, 0.4), &store, 5);
    assert_eq!(vote, SoundClass::Lead);
}

#[test]
fn test_nearest_neighbor_tie_breaks_by_declaration_order() {
    let mut store = TrainingStore::new(100);
    // Equidistant pairs: 2 Drum, 2 Pad among k=4
    store.push(features(99.0, 0.5, 0.05), SoundClass::Drum);
    store.push(features(101.0, 0.5, 0.05), SoundClass::Drum);
    store.push(features(98.0, 0.5, 0.05), SoundClass::Pad);
    store.push(features(102.0, 0.5, 0.05), SoundClass::Pad);

    let vote = nearest_neighbor_vote(&features(100.0, 0.5, 0.05), &store, 4);
    assert_eq!(vote, SoundClass::Drum, "Drum precedes Pad in priority");
}

#[test]
fn test_ensemble_confidence_values() {
    // A store firmly in Bass territory so all strategies can align
    let store = stocked_store(SoundClass::Bass, 200.0, 10);
    let result = classify(&features(200.0, 0.05, 0.02), &store, 5, NYQUIST);

    assert!(
        [1.0 / 3.0, 2.0 / 3.0, 1.0]
            .iter()
            .any(|&v| (result.confidence - v).abs() < 1e-6),
        "confidence {} not a vote fraction",
        result.confidence
    );
}

#[test]
fn test_ensemble_unanimous_vote() {
    // Low centroid, low zcr, noisy spectrum, and a Bass-heavy store: the
    // rule table, the weighted score, and the nearest neighbors all land
    // on Bass
    let store = stocked_store(SoundClass::Bass, 200.0, 10);
    let mut query = features(200.0, 0.05, 0.02);
    query.flatness = 0.9;
    let result = classify(&query, &store, 5, NYQUIST);

    assert_eq!(result.label, SoundClass::Bass);
    assert!((result.confidence - 1.0).abs() < 1e-6);
    assert_eq!(result.probabilities, vec![(SoundClass::Bass, 1.0)]);
}

#[test]
fn test_ensemble_probabilities_sum_to_one() {
    let store = stocked_store(SoundClass::Lead, 8000.0, 10);
    let result = classify(&features(1500.0, 0.5, 0.05), &store, 5, NYQUIST);

    let sum: f32 = result.probabilities.iter().map(|&(_, p)| p).sum();
    assert!((sum - 1.0).abs() < 1e-6, "probabilities sum {}", sum);

    // Descending order
    for pair in result.probabilities.windows(2) {
        assert!(pair[0].1 >= pair[1].1);
    }
}

#[test]
fn test_ensemble_split_vote_tie_break() {
    // Empty store: nearest-neighbor votes Unknown. Rule and weighted pick
    // real labels; with three distinct votes the earliest declared real
    // label wins at 1/3 confidence.
    let store = TrainingStore::new(100);
    let result = classify(&features(1500.0, 0.5, 0.05), &store, 5, NYQUIST);

    assert_ne!(result.label, SoundClass::Unknown);
    assert!(result.confidence >= 1.0 / 3.0 - 1e-6);
}

#[test]
fn test_ensemble_never_returns_zero_winner_votes() {
    let store = TrainingStore::new(10);
    for centroid in [100.0, 5000.0, 9000.0] {
        let result = classify(&features(centroid, 0.3, 0.1), &store, 5, NYQUIST);
        assert!(!result.probabilities.is_empty());
        assert!(result.probabilities[0].0 == result.label);
    }
}

#[test]
fn test_degraded_result_shape() {
    let result = ClassificationResult::unknown();
    assert_eq!(result.label, SoundClass::Unknown);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.probabilities, vec![(SoundClass::Unknown, 1.0)]);
}

#[test]
fn test_description_mentions_label() {
    let store = stocked_store(SoundClass::Bass, 200.0, 10);
    let result = classify(&features(200.0, 0.05, 0.02), &store, 5, NYQUIST);
    assert!(result.description.contains("Bass"), "{}", result.description);
}
