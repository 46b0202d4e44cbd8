//! Traffic Synthesizer
//!
//! Produces a time-ordered sequence of request-volume points over a
//! requested horizon: diurnal base load plus Gaussian jitter, with at most
//! one injected attack window per run.
//!
//! The attack decision is a single Bernoulli draw per synthesis call (or a
//! forced request from the caller); the engine never overlays two attacks.


use chrono::{DateTime, Duration, Timelike, Utc};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::constants::{BASE_TRAFFIC, DIURNAL_AMPLITUDE, JITTER_STDDEV, MIN_TRAFFIC};
use crate::sampler::{attack_envelope, diurnal_base, DiurnalShape};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Attack duration bounds (steps)
const MIN_ATTACK_STEPS: usize = 5;
const MAX_ATTACK_STEPS: usize = 20;

/// Attack intensity bounds (multiples of base traffic at peak)
const MIN_INTENSITY: f64 = 3.0;
const MAX_INTENSITY: f64 = 10.0;

/// Ramp steps cap, as in the reference ramp shape: min(3, duration / 3)
const MAX_RAMP_STEPS: f64 = 3.0;

// ============================================================================
// TYPES
// ============================================================================

/// One synthesized time step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficPoint {
    pub timestamp: DateTime<Utc>,
    pub total_requests: u64,
}

/// Caller-forced attack; unset fields are drawn randomly
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttackRequest {
    /// Step index where the attack starts
    pub start_step: Option<usize>,
    /// Attack length in steps
    pub duration_steps: Option<usize>,
    /// Peak multiplier over base traffic
    pub intensity: Option<f64>,
}

/// The attack sub-range of a synthesized series, if one was injected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackWindow {
    /// First step of the attack (inclusive)
    pub start: usize,
    /// One past the last step of the attack
    pub end: usize,
    /// Peak multiplier over base traffic
    pub intensity: f64,
}

impl AttackWindow {
    pub fn contains(&self, step: usize) -> bool {
        (self.start..self.end).contains(&step)
    }
}

/// Synthesis output: ordered points plus the injected attack, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficSeries {
    pub points: Vec<TrafficPoint>,
    pub attack: Option<AttackWindow>,
}

/// Synthesis horizon and attack knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthConfig {
    pub duration_hours: u32,
    pub interval_minutes: u32,
    /// Probability of injecting an attack this run
    pub attack_probability: f64,
    /// Force an attack regardless of probability
    pub forced_attack: Option<AttackRequest>,
    #[serde(skip)]
    pub shape: DiurnalShape,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            duration_hours: 24,
            interval_minutes: 5,
            attack_probability: 0.2,
            forced_attack: None,
            shape: DiurnalShape::default(),
        }
    }
}

// ============================================================================
// SYNTHESIS
// ============================================================================

/// Synthesize traffic ending at `end_time`.
///
/// Timestamps step backwards from `end_time` by the configured interval and
/// are emitted oldest-first. A degenerate zero-length horizon yields an
/// empty series, not an error.
pub fn synthesize_traffic<R: Rng>(
    config: &SynthConfig,
    end_time: DateTime<Utc>,
    rng: &mut R,
) -> Result<TrafficSeries, ConfigError> {
    if !(0.0..=1.0).contains(&config.attack_probability) {
        return Err(ConfigError::InvalidProbability(config.attack_probability));
    }
    if config.interval_minutes == 0 {
        return Err(ConfigError::ZeroWindow);
    }

    let num_points = (config.duration_hours as usize * 60) / config.interval_minutes as usize;
    if num_points == 0 {
        return Ok(TrafficSeries {
            points: Vec::new(),
            attack: None,
        });
    }

    let interval = Duration::minutes(config.interval_minutes as i64);
    let start_time = end_time - interval * (num_points as i32 - 1);

    // Base load: diurnal curve plus independent Gaussian jitter, floored.
    // JITTER_STDDEV is a positive finite constant, so construction only
    // fails if that constant is edited into nonsense.
    let jitter =
        Normal::new(0.0, JITTER_STDDEV).map_err(|_| ConfigError::InvalidDistribution("jitter stddev"))?;
    let mut base: Vec<f64> = Vec::with_capacity(num_points);
    for i in 0..num_points {
        let ts = start_time + interval * i as i32;
        let day_factor = diurnal_base(ts.hour(), config.shape);
        let level = BASE_TRAFFIC + DIURNAL_AMPLITUDE * day_factor + jitter.sample(rng);
        base.push(level.max(MIN_TRAFFIC as f64));
    }

    // Zero or one attack per run
    let attack = plan_attack(config, num_points, rng);
    if let Some(window) = &attack {
        let duration = window.end - window.start;
        let ramp_fraction = (MAX_RAMP_STEPS / duration as f64).min(1.0 / 3.0);
        let envelope = attack_envelope(duration, ramp_fraction);
        for (offset, multiplier) in envelope.iter().enumerate() {
            let idx = window.start + offset;
            base[idx] *= 1.0 + window.intensity * multiplier;
        }
        log::info!(
            "Injected attack: steps {}..{} at {:.1}x peak",
            window.start,
            window.end,
            window.intensity
        );
    }

    let points = base
        .iter()
        .enumerate()
        .map(|(i, level)| TrafficPoint {
            timestamp: start_time + interval * i as i32,
            total_requests: level.round().max(MIN_TRAFFIC as f64) as u64,
        })
        .collect();

    Ok(TrafficSeries { points, attack })
}

/// Decide whether and where an attack lands this run.
fn plan_attack<R: Rng>(config: &SynthConfig, num_points: usize, rng: &mut R) -> Option<AttackWindow> {
    let forced = config.forced_attack.as_ref();
    if forced.is_none() && !rng.gen_bool(config.attack_probability) {
        return None;
    }
    if num_points < 2 {
        return None;
    }

    // Start uniformly within the middle half of the horizon
    let lo = num_points / 4;
    let hi = (num_points * 3 / 4).max(lo + 1);
    let start = forced
        .and_then(|f| f.start_step)
        .unwrap_or_else(|| rng.gen_range(lo..hi))
        .min(num_points - 1);

    let duration = forced
        .and_then(|f| f.duration_steps)
        .unwrap_or_else(|| rng.gen_range(MIN_ATTACK_STEPS..=MAX_ATTACK_STEPS));
    let end = (start + duration.max(1)).min(num_points);

    let intensity = forced
        .and_then(|f| f.intensity)
        .unwrap_or_else(|| rng.gen_range(MIN_INTENSITY..=MAX_INTENSITY));

    Some(AttackWindow {
        start,
        end,
        intensity,
    })
}
