use rand::rngs::StdRng;
use rand::SeedableRng;

use super::diurnal::{diurnal_base, DiurnalShape};
use super::envelope::attack_envelope;
use super::split::{apportion, concentrated_split, skewed_split};
use crate::config::ConfigError;

// ============================================================================
// DIURNAL
// ============================================================================

#[test]
fn diurnal_peaks_at_midday() {
    let shape = DiurnalShape::default();
    let noon = diurnal_base(12, shape);
    assert!((noon - 1.0).abs() < 1e-9);
    assert!(noon > diurnal_base(7, shape));
    assert!(noon > diurnal_base(17, shape));
}

#[test]
fn diurnal_flat_bands() {
    let shape = DiurnalShape::default();
    for hour in 0..6 {
        assert_eq!(diurnal_base(hour, shape), 0.2);
    }
    for hour in 19..24 {
        assert_eq!(diurnal_base(hour, shape), 0.3);
    }
}

#[test]
fn diurnal_wraps_hours() {
    let shape = DiurnalShape::default();
    assert_eq!(diurnal_base(25, shape), diurnal_base(1, shape));
}

// ============================================================================
// ENVELOPE
// ============================================================================

#[test]
fn envelope_three_phases() {
    let curve = attack_envelope(10, 0.3);
    assert_eq!(curve.len(), 10);
    // ramp of 3 on each side, plateau of 4
    assert!(curve[0] < curve[1] && curve[1] < curve[2]);
    assert_eq!(curve[3], 1.0);
    assert_eq!(curve[6], 1.0);
    assert!(curve[7] > curve[8] && curve[8] > curve[9]);
}

#[test]
fn envelope_continuous_at_boundaries() {
    let curve = attack_envelope(12, 0.25);
    let ramp = 3;
    // last ramp-up step reaches the plateau exactly
    assert_eq!(curve[ramp - 1], 1.0);
    assert_eq!(curve[curve.len() - ramp], 1.0);
}

#[test]
fn envelope_symmetric() {
    let curve = attack_envelope(15, 0.2);
    for i in 0..curve.len() {
        assert!((curve[i] - curve[curve.len() - 1 - i]).abs() < 1e-9);
    }
}

#[test]
fn envelope_empty_and_degenerate() {
    assert!(attack_envelope(0, 0.3).is_empty());
    // ramp_fraction 0 means pure plateau
    assert!(attack_envelope(4, 0.0).iter().all(|&v| v == 1.0));
}

// ============================================================================
// SPLITS
// ============================================================================

#[test]
fn apportion_is_exact() {
    let out = apportion(1000, &[3.0, 1.0, 1.0]);
    assert_eq!(out.iter().sum::<u64>(), 1000);
    assert_eq!(out.len(), 3);
    assert!(out[0] > out[1]);
}

#[test]
fn apportion_uniform_fallback_on_zero_weights() {
    let out = apportion(9, &[0.0, 0.0, 0.0]);
    assert_eq!(out.iter().sum::<u64>(), 9);
}

#[test]
fn skewed_split_sums_exactly() {
    let mut rng = StdRng::seed_from_u64(7);
    for total in [0u64, 1, 17, 350, 10_000] {
        let out = skewed_split(total, 25, &mut rng).unwrap();
        assert_eq!(out.len(), 25);
        assert_eq!(out.iter().sum::<u64>(), total);
    }
}

#[test]
fn skewed_split_rejects_empty_population() {
    let mut rng = StdRng::seed_from_u64(7);
    assert_eq!(
        skewed_split(100, 0, &mut rng),
        Err(ConfigError::EmptyPopulation)
    );
}

#[test]
fn skewed_split_zero_total_is_zeros() {
    let mut rng = StdRng::seed_from_u64(7);
    let out = skewed_split(0, 8, &mut rng).unwrap();
    assert!(out.iter().all(|&v| v == 0));
}

#[test]
fn concentrated_split_attacker_share() {
    let mut rng = StdRng::seed_from_u64(42);
    for total in [100u64, 350, 999, 5000] {
        let out = concentrated_split(total, 20, 0.7, &mut rng).unwrap();
        assert_eq!(out.len(), 20);
        assert_eq!(out.iter().sum::<u64>(), total);

        let expected = (total as f64 * 0.7).round() as i64;
        assert!((out[0] as i64 - expected).abs() <= 1);
    }
}

#[test]
fn concentrated_split_floors_bystanders_at_one() {
    let mut rng = StdRng::seed_from_u64(42);
    let out = concentrated_split(50, 10, 0.8, &mut rng).unwrap();
    assert!(out.iter().all(|&v| v >= 1));
    assert_eq!(out.iter().sum::<u64>(), 50);
}

#[test]
fn concentrated_split_rejects_bad_ratio() {
    let mut rng = StdRng::seed_from_u64(42);
    assert!(matches!(
        concentrated_split(100, 5, 0.0, &mut rng),
        Err(ConfigError::InvalidRatio(_))
    ));
    assert!(matches!(
        concentrated_split(100, 5, 1.2, &mut rng),
        Err(ConfigError::InvalidRatio(_))
    ));
}
