use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;

fn ts() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 10, 0, 0).unwrap()
}

fn snapshot(total: u64, addresses: &[(&str, u64)]) -> TrafficSnapshot {
    let address_requests: HashMap<String, u64> = addresses
        .iter()
        .map(|(a, r)| (a.to_string(), *r))
        .collect();
    TrafficSnapshot {
        timestamp: ts(),
        total_requests_per_minute: total,
        unique_addresses: address_requests.len(),
        blocked_addresses: 0,
        suspicious_addresses: 0,
        address_requests,
        request_change: 0,
        address_change: 0,
        blocked_change: 0,
        suspicious_change: 0,
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

#[test]
fn high_total_emits_aggregate_critical() {
    let alerts = check_alerts(&snapshot(350, &[]), 100).unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Critical);
    assert_eq!(alerts[0].address, MULTIPLE_ADDRESSES);
    assert_eq!(
        alerts[0].message,
        "CRITICAL: Extremely high traffic volume detected (350 requests/min)"
    );
}

#[test]
fn total_at_threshold_tripled_is_quiet() {
    // 300 is not strictly greater than 3 x 100
    assert!(check_alerts(&snapshot(300, &[]), 100).unwrap().is_empty());
}

#[test]
fn single_warm_address_emits_one_warning() {
    let alerts = check_alerts(&snapshot(150, &[("10.0.0.9", 150)]), 100).unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Warning);
    assert_eq!(alerts[0].address, "10.0.0.9");
    assert_eq!(
        alerts[0].message,
        "WARNING: High traffic from 10.0.0.9 (150 requests/min)"
    );
}

#[test]
fn tier_boundary_is_critical_inclusive() {
    let alerts = check_alerts(&snapshot(200, &[("10.0.0.9", 200)]), 100).unwrap();
    assert_eq!(alerts[0].severity, Severity::Critical);

    let alerts = check_alerts(&snapshot(199, &[("10.0.0.9", 199)]), 100).unwrap();
    assert_eq!(alerts[0].severity, Severity::Warning);
}

#[test]
fn at_threshold_is_quiet() {
    assert!(check_alerts(&snapshot(100, &[("10.0.0.9", 100)]), 100)
        .unwrap()
        .is_empty());
}

#[test]
fn zero_threshold_is_config_error() {
    assert_eq!(
        check_alerts(&snapshot(350, &[]), 0),
        Err(ConfigError::ZeroThreshold)
    );
}

#[test]
fn aggregate_and_per_address_combine() {
    let alerts = check_alerts(
        &snapshot(900, &[("10.0.0.1", 250), ("10.0.0.2", 150), ("10.0.0.3", 40)]),
        100,
    )
    .unwrap();
    assert_eq!(alerts.len(), 3);
    assert_eq!(alerts[0].address, MULTIPLE_ADDRESSES);
    let severities: Vec<Severity> = alerts[1..].iter().map(|a| a.severity).collect();
    assert_eq!(severities, vec![Severity::Critical, Severity::Warning]);
}

// ============================================================================
// ENGINE STATE
// ============================================================================

#[test]
fn repeated_evaluation_does_not_duplicate() {
    let engine = AlertEngine::new();
    let snap = snapshot(350, &[("10.0.0.9", 150)]);

    let first = engine.evaluate(&snap, 100).unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(engine.len(), 2);

    let second = engine.evaluate(&snap, 100).unwrap();
    assert!(second.is_empty());
    assert_eq!(engine.len(), 2);

    // No duplicate identities in the stored set
    let active = engine.active_sorted();
    for (i, a) in active.iter().enumerate() {
        for b in &active[i + 1..] {
            assert!(!a.same_identity(b));
        }
    }
}

#[test]
fn duplicates_within_one_batch_collapse() {
    let engine = AlertEngine::new();
    let alert = Alert {
        timestamp: ts(),
        severity: Severity::Warning,
        message: "WARNING: High traffic from 10.0.0.9 (150 requests/min)".to_string(),
        address: "10.0.0.9".to_string(),
    };
    let appended = engine.merge(vec![alert.clone(), alert]);
    assert_eq!(appended.len(), 1);
    assert_eq!(engine.len(), 1);
}

#[test]
fn dismiss_removes_exactly_one_match() {
    let engine = AlertEngine::new();
    let snap = snapshot(350, &[("10.0.0.9", 150)]);
    let alerts = engine.evaluate(&snap, 100).unwrap();

    assert!(engine.dismiss(&alerts[0]));
    assert_eq!(engine.len(), 1);

    // Dismissing again is a no-op, not an error
    assert!(!engine.dismiss(&alerts[0]));
    assert_eq!(engine.len(), 1);
}

#[test]
fn identity_ignores_timestamp() {
    let engine = AlertEngine::new();
    let mut alert = Alert {
        timestamp: ts(),
        severity: Severity::Critical,
        message: "CRITICAL: High traffic from 10.0.0.9 (250 requests/min)".to_string(),
        address: "10.0.0.9".to_string(),
    };
    engine.merge(vec![alert.clone()]);

    alert.timestamp = ts() + Duration::minutes(5);
    let appended = engine.merge(vec![alert]);
    assert!(appended.is_empty());
}

#[test]
fn clear_all_empties_unconditionally() {
    let engine = AlertEngine::new();
    engine.evaluate(&snapshot(900, &[("10.0.0.1", 250)]), 100).unwrap();
    assert!(!engine.is_empty());
    engine.clear_all();
    assert!(engine.is_empty());
    // Clearing an empty set is fine too
    engine.clear_all();
}

#[test]
fn active_alerts_sorted_newest_first() {
    let engine = AlertEngine::new();
    for minutes in [3i64, 1, 2] {
        engine.merge(vec![Alert {
            timestamp: ts() + Duration::minutes(minutes),
            severity: Severity::Warning,
            message: format!("WARNING: High traffic from 10.0.0.{} (150 requests/min)", minutes),
            address: format!("10.0.0.{}", minutes),
        }]);
    }
    let sorted = engine.active_sorted();
    assert_eq!(sorted.len(), 3);
    assert!(sorted[0].timestamp > sorted[1].timestamp);
    assert!(sorted[1].timestamp > sorted[2].timestamp);
}

// ============================================================================
// SNAPSHOTS
// ============================================================================

#[test]
fn snapshot_from_samples_aggregates() {
    use crate::attribution::AddressSample;
    let samples = vec![
        AddressSample { timestamp: ts(), address: "10.0.0.1".into(), requests: 250 },
        AddressSample { timestamp: ts(), address: "10.0.0.2".into(), requests: 150 },
        AddressSample { timestamp: ts(), address: "10.0.0.2".into(), requests: 10 },
        AddressSample { timestamp: ts(), address: "10.0.0.3".into(), requests: 40 },
    ];
    let snap = TrafficSnapshot::from_samples(ts(), &samples);
    assert_eq!(snap.total_requests_per_minute, 450);
    assert_eq!(snap.unique_addresses, 3);
    assert_eq!(snap.blocked_addresses, 1);
    assert_eq!(snap.suspicious_addresses, 1);
    assert_eq!(snap.address_requests["10.0.0.2"], 160);
}

#[test]
fn generated_snapshot_is_internally_consistent() {
    let mut rng = StdRng::seed_from_u64(21);
    let snap = TrafficSnapshot::generate(ts(), &mut rng);
    assert_eq!(
        snap.total_requests_per_minute,
        snap.address_requests.values().sum::<u64>()
    );
    assert_eq!(snap.unique_addresses, snap.address_requests.len());
    assert!(snap.address_requests.values().all(|&r| r >= 1 && r < 500));
}
