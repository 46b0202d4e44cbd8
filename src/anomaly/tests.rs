use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::attribution::AddressSample;

fn ts(minute: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 10, minute, 0).unwrap()
}

fn sample(minute: u32, address: &str, requests: u64) -> AddressSample {
    AddressSample {
        timestamp: ts(minute),
        address: address.to_string(),
        requests,
    }
}

#[test]
fn zero_expected_is_floored_to_one() {
    let anomaly = score_one(ts(0), "10.0.0.1", 50, 0, 5.0).unwrap();
    assert_eq!(anomaly.expected_requests, 1);
    assert_eq!(anomaly.ratio(), 50.0);
}

#[test]
fn below_multiplier_is_not_emitted() {
    assert!(score_one(ts(0), "10.0.0.1", 49, 10, 5.0).is_none());
    assert!(score_one(ts(0), "10.0.0.1", 50, 10, 5.0).is_some());
}

#[test]
fn trailing_window_mean_drives_detection() {
    let samples = vec![
        sample(0, "10.0.0.1", 10),
        sample(1, "10.0.0.1", 12),
        sample(2, "10.0.0.1", 8),
        // 10x the trailing mean of 10
        sample(3, "10.0.0.1", 100),
    ];
    let anomalies = score_anomalies(&samples, Duration::minutes(10), 5.0);
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].address, "10.0.0.1");
    assert_eq!(anomalies[0].observed_requests, 100);
    assert_eq!(anomalies[0].expected_requests, 10);
    assert!(anomalies[0].ratio() >= 5.0);
}

#[test]
fn first_observation_is_never_flagged() {
    let samples = vec![sample(0, "10.0.0.1", 100_000)];
    assert!(score_anomalies(&samples, Duration::minutes(10), 5.0).is_empty());
}

#[test]
fn steady_traffic_yields_empty_result() {
    let samples: Vec<AddressSample> = (0..30)
        .map(|m| sample(m, "10.0.0.1", 20 + (m as u64 % 3)))
        .collect();
    assert!(score_anomalies(&samples, Duration::minutes(15), 5.0).is_empty());
}

#[test]
fn addresses_are_scored_independently() {
    let samples = vec![
        sample(0, "10.0.0.1", 10),
        sample(0, "10.0.0.2", 500),
        sample(1, "10.0.0.1", 80),
        sample(1, "10.0.0.2", 520),
    ];
    let anomalies = score_anomalies(&samples, Duration::minutes(10), 5.0);
    // Only .1 spikes relative to its own history; .2 is steady
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].address, "10.0.0.1");
}

#[test]
fn old_history_falls_out_of_the_window() {
    let samples = vec![
        sample(0, "10.0.0.1", 10),
        // The earlier point is outside a 2-minute window
        sample(5, "10.0.0.1", 100),
    ];
    assert!(score_anomalies(&samples, Duration::minutes(2), 5.0).is_empty());
}

#[test]
fn baseline_window_tracks_sample_cadence() {
    let samples = vec![
        sample(0, "10.0.0.1", 10),
        sample(5, "10.0.0.1", 10),
        sample(10, "10.0.0.1", 10),
    ];
    // Six steps of the 5-minute cadence
    assert_eq!(baseline_window(&samples), Duration::minutes(30));
}

#[test]
fn baseline_window_ignores_repeated_timestamps() {
    let samples = vec![
        sample(0, "10.0.0.1", 10),
        sample(0, "10.0.0.2", 12),
        sample(2, "10.0.0.1", 10),
    ];
    assert_eq!(baseline_window(&samples), Duration::minutes(12));
    assert_eq!(baseline_window(&[]), Duration::zero());
}

#[test]
fn generated_anomalies_pass_their_own_gate() {
    let end = ts(0);
    let mut found = false;
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let anomalies = generate_anomalies(end, 120, &mut rng);
        for a in &anomalies {
            assert!((10..=50).contains(&a.expected_requests));
            assert!(a.ratio() >= 5.0 && a.ratio() <= 20.0);
            found = true;
        }
    }
    assert!(found, "ten seeds should produce at least one anomaly");
}

#[test]
fn generated_anomalies_sorted_and_bounded() {
    let mut rng = StdRng::seed_from_u64(3);
    let end = ts(0);
    let anomalies = generate_anomalies(end, 240, &mut rng);
    for pair in anomalies.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
    for a in &anomalies {
        assert!(a.timestamp <= end);
        assert!(a.timestamp >= end - Duration::minutes(240));
    }
}
