//! Address Attributor
//!
//! Splits each traffic point's aggregate request count across a subset of
//! the address population. Normal points get the Zipf-skewed split; points
//! inside an attack window get the concentrated split, with the designated
//! attacker addresses folded into the selected subset.
//!
//! The population is fixed ahead of a run; attribution only selects
//! subsets, it never invents addresses mid-run.


use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::constants::{ATTACKER_SLOTS, MAX_SUBSET, MIN_SUBSET};
use crate::sampler::{concentrated_split, skewed_split};
use crate::synth::TrafficPoint;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Share of an attack point's total handed to the designated attacker
const CONCENTRATION_LO: f64 = 0.6;
const CONCENTRATION_HI: f64 = 0.8;

// ============================================================================
// TYPES
// ============================================================================

/// Per-address slice of one traffic point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSample {
    pub timestamp: DateTime<Utc>,
    pub address: String,
    pub requests: u64,
}

/// Whether the current point sits inside an attack window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AttackState {
    Inactive,
    Active { attackers: Vec<String> },
}

impl AttackState {
    pub fn is_active(&self) -> bool {
        matches!(self, AttackState::Active { .. })
    }
}

// ============================================================================
// POPULATION
// ============================================================================

/// Generate a fixed population of synthetic IPv4 addresses.
pub fn generate_addresses<R: Rng>(count: usize, rng: &mut R) -> Vec<String> {
    (0..count)
        .map(|_| {
            format!(
                "{}.{}.{}.{}",
                rng.gen_range(1..=255u16),
                rng.gen_range(0..=255u16),
                rng.gen_range(0..=255u16),
                rng.gen_range(1..=255u16)
            )
        })
        .collect()
}

// ============================================================================
// ATTRIBUTION
// ============================================================================

/// Split one traffic point across a subset of `population`.
///
/// The emitted samples sum to `point.total_requests` exactly. During an
/// attack the designated attacker (rotating through the attacker list by
/// minute) receives the concentration share; the remaining attackers ride
/// along in the ordinary part of the split.
pub fn attribute_addresses<R: Rng>(
    point: &TrafficPoint,
    population: &[String],
    attack: &AttackState,
    rng: &mut R,
) -> Result<Vec<AddressSample>, ConfigError> {
    if population.is_empty() {
        return Err(ConfigError::EmptyPopulation);
    }

    let subset_size = rng.gen_range(MIN_SUBSET..=MAX_SUBSET).min(population.len());

    let (addresses, counts) = match attack {
        AttackState::Inactive => {
            let selected: Vec<String> = population
                .choose_multiple(rng, subset_size)
                .cloned()
                .collect();
            let counts = skewed_split(point.total_requests, selected.len(), rng)?;
            (selected, counts)
        }
        AttackState::Active { attackers } if attackers.is_empty() => {
            return Err(ConfigError::EmptyPopulation);
        }
        AttackState::Active { attackers } => {
            // Reserve slots for the attackers, bystanders fill the rest.
            // Attackers may also appear in the population; keep them out
            // of the bystander pool so no address is sampled twice.
            let reserved = attackers.len().min(ATTACKER_SLOTS);
            let bystander_count = subset_size.saturating_sub(reserved).max(1);
            let pool: Vec<&String> = population
                .iter()
                .filter(|a| !attackers.contains(a))
                .collect();
            let bystanders = pool
                .choose_multiple(rng, bystander_count.min(pool.len()))
                .map(|a| (*a).clone());

            // Rotate the primary attacker by minute, as the reference does
            let rotation = (point.timestamp.timestamp() / 60).rem_euclid(reserved as i64) as usize;
            let mut selected: Vec<String> = Vec::with_capacity(reserved + bystander_count);
            selected.push(attackers[rotation].clone());
            selected.extend(
                attackers
                    .iter()
                    .take(reserved)
                    .enumerate()
                    .filter(|(i, _)| *i != rotation)
                    .map(|(_, a)| a.clone()),
            );
            selected.extend(bystanders);

            let ratio = rng.gen_range(CONCENTRATION_LO..CONCENTRATION_HI);
            let counts = concentrated_split(point.total_requests, selected.len(), ratio, rng)?;
            (selected, counts)
        }
    };

    Ok(addresses
        .into_iter()
        .zip(counts)
        .map(|(address, requests)| AddressSample {
            timestamp: point.timestamp,
            address,
            requests,
        })
        .collect())
}

/// Attribute a whole series, deriving the attack state per step.
pub fn attribute_series<R: Rng>(
    series: &crate::synth::TrafficSeries,
    population: &[String],
    attackers: &[String],
    rng: &mut R,
) -> Result<Vec<AddressSample>, ConfigError> {
    let mut samples = Vec::new();
    for (step, point) in series.points.iter().enumerate() {
        let state = match &series.attack {
            Some(window) if window.contains(step) && !attackers.is_empty() => {
                AttackState::Active {
                    attackers: attackers.to_vec(),
                }
            }
            _ => AttackState::Inactive,
        };
        samples.extend(attribute_addresses(point, population, &state, rng)?);
    }
    log::debug!(
        "Attributed {} samples across {} points",
        samples.len(),
        series.points.len()
    );
    Ok(samples)
}
