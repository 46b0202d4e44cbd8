//! Anomaly Scorer
//!
//! Flags address samples whose observed request count sits far above the
//! locally expected baseline. The baseline is the mean of the address's
//! trailing observations inside the monitoring window; an address with no
//! history yet cannot be judged and is never flagged.
//!
//! Zero anomalies over a range is a legitimate, expected result.

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::attribution::AddressSample;
use crate::constants::{BASELINE_WINDOW_STEPS, DETECTION_MULTIPLIER};

// ============================================================================
// TYPES
// ============================================================================

/// One flagged observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    pub timestamp: DateTime<Utc>,
    pub address: String,
    pub observed_requests: u64,
    /// Always >= 1; floored before any ratio is taken
    pub expected_requests: u64,
}

impl Anomaly {
    /// Observed-over-expected ratio. Finite by construction since
    /// `expected_requests` is floored at 1.
    pub fn ratio(&self) -> f64 {
        self.observed_requests as f64 / self.expected_requests.max(1) as f64
    }
}

// ============================================================================
// SCORING
// ============================================================================

/// Compare a single observation against its expected baseline.
///
/// `expected` is floored at 1 so the ratio is always finite. Returns the
/// anomaly only when the ratio reaches `multiplier`.
pub fn score_one(
    timestamp: DateTime<Utc>,
    address: &str,
    observed: u64,
    expected: u64,
    multiplier: f64,
) -> Option<Anomaly> {
    let expected = expected.max(1);
    let ratio = observed as f64 / expected as f64;
    if ratio < multiplier {
        return None;
    }
    Some(Anomaly {
        timestamp,
        address: address.to_string(),
        observed_requests: observed,
        expected_requests: expected,
    })
}

/// Score a batch of samples against per-address trailing baselines.
///
/// For each sample, the expected value is the mean of the same address's
/// earlier samples within `window` before it. Samples must not precede
/// their own history; callers pass them in timestamp order (the attributor
/// emits them that way).
pub fn score_anomalies(
    samples: &[AddressSample],
    window: Duration,
    multiplier: f64,
) -> Vec<Anomaly> {
    let mut history: HashMap<&str, Vec<(DateTime<Utc>, u64)>> = HashMap::new();
    let mut anomalies = Vec::new();

    for sample in samples {
        let trail = history.entry(sample.address.as_str()).or_default();

        let cutoff = sample.timestamp - window;
        let (sum, count) = trail
            .iter()
            .filter(|(ts, _)| *ts >= cutoff && *ts < sample.timestamp)
            .fold((0u64, 0u64), |(s, c), (_, r)| (s + r, c + 1));

        if count > 0 {
            let expected = (sum as f64 / count as f64).round() as u64;
            if let Some(anomaly) = score_one(
                sample.timestamp,
                &sample.address,
                sample.requests,
                expected,
                multiplier,
            ) {
                anomalies.push(anomaly);
            }
        }

        trail.push((sample.timestamp, sample.requests));
    }

    if !anomalies.is_empty() {
        log::debug!("Scored {} anomalies from {} samples", anomalies.len(), samples.len());
    }
    anomalies
}

/// Convenience wrapper using the crate-default detection multiplier.
pub fn score_anomalies_default(samples: &[AddressSample], window: Duration) -> Vec<Anomaly> {
    score_anomalies(samples, window, DETECTION_MULTIPLIER)
}

/// Smallest window that still gives every sample a trailing baseline:
/// several steps of the samples' own cadence.
///
/// The cadence is the smallest positive gap between consecutive
/// timestamps. A window narrower than one step would exclude all history
/// and silence the scorer entirely, so callers take the max of this and
/// their configured monitoring window.
pub fn baseline_window(samples: &[AddressSample]) -> Duration {
    let mut step = Duration::zero();
    for pair in samples.windows(2) {
        let gap = pair[1].timestamp - pair[0].timestamp;
        if gap > Duration::zero() && (step == Duration::zero() || gap < step) {
            step = gap;
        }
    }
    step * BASELINE_WINDOW_STEPS
}

// ============================================================================
// SYNTHETIC ANOMALY FEED
// ============================================================================

/// Anomaly observations per half hour of range
const ANOMALIES_PER_HALF_HOUR: i64 = 1;

/// Chance that a range contains no anomalies at all
const QUIET_RANGE_PROBABILITY: f64 = 0.1;

/// Generate a synthetic anomaly feed for dashboard exercise.
///
/// Expected counts fall in the normal 10-50 band; observed counts are 5-20x
/// above, matching the detection multiplier so every generated record would
/// also pass `score_one`.
pub fn generate_anomalies<R: Rng>(
    end_time: DateTime<Utc>,
    range_minutes: u32,
    rng: &mut R,
) -> Vec<Anomaly> {
    if range_minutes == 0 || rng.gen_bool(QUIET_RANGE_PROBABILITY) {
        return Vec::new();
    }

    let count = ((range_minutes as i64 / 30) * ANOMALIES_PER_HALF_HOUR).max(1);
    let start_time = end_time - Duration::minutes(range_minutes as i64);

    let mut anomalies: Vec<Anomaly> = (0..count)
        .map(|_| {
            let offset = rng.gen_range(0..range_minutes as i64);
            let expected = rng.gen_range(10..=50u64);
            let observed = expected * rng.gen_range(5..=20u64);
            Anomaly {
                timestamp: start_time + Duration::minutes(offset),
                address: format!(
                    "192.168.{}.{}",
                    rng.gen_range(1..=255u16),
                    rng.gen_range(1..=255u16)
                ),
                observed_requests: observed,
                expected_requests: expected,
            }
        })
        .collect();

    anomalies.sort_by_key(|a| a.timestamp);
    anomalies
}
