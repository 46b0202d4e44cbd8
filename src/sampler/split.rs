//! Population splits
//!
//! Spreads an aggregate request count across a population of buckets.
//! Normal traffic uses a Zipf-skewed split (a small minority of addresses
//! dominate); attack traffic uses a concentrated split that hands one
//! designated attacker a fixed share of the total.
//!
//! Both splits guarantee the result sums to `total` exactly: fractional
//! shares are floored and the remainder is corrected onto the largest
//! bucket.

use rand::Rng;
use rand_distr::{Distribution, Exp, Zipf};

use crate::config::ConfigError;
use crate::constants::ZIPF_SHAPE;

/// Support of the Zipf draw used for split weights
const ZIPF_POPULATION: u64 = 1_000;

// ============================================================================
// APPORTIONMENT
// ============================================================================

/// Split `total` proportionally to `weights`, exactly.
///
/// Floors each share and gives the rounding gap to the heaviest bucket.
/// A degenerate all-zero weight vector falls back to a uniform split.
pub fn apportion(total: u64, weights: &[f64]) -> Vec<u64> {
    if weights.is_empty() {
        return Vec::new();
    }

    let sum: f64 = weights.iter().sum();
    let shares: Vec<f64> = if sum > 0.0 {
        weights.iter().map(|w| w / sum).collect()
    } else {
        vec![1.0 / weights.len() as f64; weights.len()]
    };

    let mut out: Vec<u64> = shares
        .iter()
        .map(|s| (s * total as f64).floor() as u64)
        .collect();

    let assigned: u64 = out.iter().sum();
    let gap = total - assigned;
    if gap > 0 {
        let largest = shares
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap_or(0);
        out[largest] += gap;
    }
    out
}

// ============================================================================
// SKEWED SPLIT (normal traffic)
// ============================================================================

/// Zipf-weighted split of `total` across `n` buckets.
///
/// Result has length `n`, every entry >= 0, and sums to `total` exactly.
/// `n = 0` is a configuration error; `total = 0` yields all zeros.
pub fn skewed_split<R: Rng>(total: u64, n: usize, rng: &mut R) -> Result<Vec<u64>, ConfigError> {
    if n == 0 {
        return Err(ConfigError::EmptyPopulation);
    }
    if total == 0 {
        return Ok(vec![0; n]);
    }

    // ZIPF_SHAPE > 1 and ZIPF_POPULATION > 0, so construction cannot fail
    let zipf = Zipf::new(ZIPF_POPULATION, ZIPF_SHAPE)
        .map_err(|_| ConfigError::InvalidDistribution("zipf shape"))?;
    let weights: Vec<f64> = (0..n).map(|_| zipf.sample(rng)).collect();

    Ok(apportion(total, &weights))
}

// ============================================================================
// CONCENTRATED SPLIT (attack traffic)
// ============================================================================

/// Attack split: entry 0 is the designated attacker and receives
/// `round(total * concentration_ratio)` requests; the remaining `n - 1`
/// entries share the rest under exponential-decay weights.
///
/// When `total >= n` every entry is >= 1 (the attacker share is clamped so
/// each bystander keeps at least one request).
pub fn concentrated_split<R: Rng>(
    total: u64,
    n: usize,
    concentration_ratio: f64,
    rng: &mut R,
) -> Result<Vec<u64>, ConfigError> {
    if n == 0 {
        return Err(ConfigError::EmptyPopulation);
    }
    if !(0.0..1.0).contains(&concentration_ratio) || concentration_ratio == 0.0 {
        return Err(ConfigError::InvalidRatio(concentration_ratio));
    }
    if total == 0 {
        return Ok(vec![0; n]);
    }
    if n == 1 {
        return Ok(vec![total]);
    }

    let others = (n - 1) as u64;
    let mut attacker = (total as f64 * concentration_ratio).round() as u64;
    attacker = attacker.max(1);
    if total >= n as u64 {
        // Leave at least one request per bystander
        attacker = attacker.min(total - others);
    } else {
        attacker = attacker.min(total);
    }

    let remainder = total - attacker;
    let exp = Exp::new(1.0).map_err(|_| ConfigError::InvalidDistribution("exponential rate"))?;
    let weights: Vec<f64> = (0..n - 1).map(|_| exp.sample(rng)).collect();

    let mut out = Vec::with_capacity(n);
    out.push(attacker);
    if total >= n as u64 {
        // One guaranteed request each, the rest by weight
        let spread = apportion(remainder - others, &weights);
        out.extend(spread.into_iter().map(|v| v + 1));
    } else {
        out.extend(apportion(remainder, &weights));
    }
    Ok(out)
}
