//! Traffic snapshot
//!
//! The per-cycle view the alert engine evaluates: aggregate rate, the
//! per-address request map, tier counts, and delta-vs-previous-period
//! fields for dashboard indicators.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::attribution::AddressSample;
use crate::constants::{CRITICAL_BOUND, SUSPICIOUS_BOUND};

/// Addresses in a synthetic snapshot
const SNAPSHOT_ADDRESSES: usize = 50;

/// Chance a synthetic address runs hot
const HOT_ADDRESS_PROBABILITY: f64 = 0.1;

/// Current traffic metrics for one evaluation cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficSnapshot {
    pub timestamp: DateTime<Utc>,
    pub total_requests_per_minute: u64,
    pub address_requests: HashMap<String, u64>,
    pub unique_addresses: usize,
    pub blocked_addresses: usize,
    pub suspicious_addresses: usize,
    /// Percent deltas against the previous period, for display widgets
    pub request_change: i64,
    pub address_change: i64,
    pub blocked_change: i64,
    pub suspicious_change: i64,
}

impl TrafficSnapshot {
    /// Aggregate attributed samples (normally those of the latest time
    /// step) into a snapshot. Delta fields are zero; only the synthetic
    /// generator fills them.
    pub fn from_samples(timestamp: DateTime<Utc>, samples: &[AddressSample]) -> Self {
        let mut address_requests: HashMap<String, u64> = HashMap::new();
        for s in samples {
            *address_requests.entry(s.address.clone()).or_default() += s.requests;
        }

        let total = address_requests.values().sum();
        let blocked = address_requests
            .values()
            .filter(|&&r| r > CRITICAL_BOUND)
            .count();
        let suspicious = address_requests
            .values()
            .filter(|&&r| r > SUSPICIOUS_BOUND && r <= CRITICAL_BOUND)
            .count();

        Self {
            timestamp,
            total_requests_per_minute: total,
            unique_addresses: address_requests.len(),
            blocked_addresses: blocked,
            suspicious_addresses: suspicious,
            address_requests,
            request_change: 0,
            address_change: 0,
            blocked_change: 0,
            suspicious_change: 0,
        }
    }

    /// Fully synthetic snapshot for driving the dashboard without a
    /// synthesis run. About one address in ten runs hot.
    pub fn generate<R: Rng>(timestamp: DateTime<Utc>, rng: &mut R) -> Self {
        let mut address_requests = HashMap::with_capacity(SNAPSHOT_ADDRESSES);
        for _ in 0..SNAPSHOT_ADDRESSES {
            let address = format!(
                "192.168.{}.{}",
                rng.gen_range(1..=255u16),
                rng.gen_range(1..=255u16)
            );
            let requests = if rng.gen_bool(HOT_ADDRESS_PROBABILITY) {
                rng.gen_range(80..500u64)
            } else {
                rng.gen_range(1..80u64)
            };
            address_requests.insert(address, requests);
        }

        let mut snapshot = Self::from_samples(timestamp, &[]);
        snapshot.total_requests_per_minute = address_requests.values().sum();
        snapshot.unique_addresses = address_requests.len();
        snapshot.blocked_addresses = address_requests
            .values()
            .filter(|&&r| r > CRITICAL_BOUND)
            .count();
        snapshot.suspicious_addresses = address_requests
            .values()
            .filter(|&&r| r > SUSPICIOUS_BOUND && r <= CRITICAL_BOUND)
            .count();
        snapshot.address_requests = address_requests;
        snapshot.request_change = rng.gen_range(-15..25);
        snapshot.address_change = rng.gen_range(-5..15);
        snapshot.blocked_change = rng.gen_range(-3..10);
        snapshot.suspicious_change = rng.gen_range(-8..20);
        snapshot
    }
}
