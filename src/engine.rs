//! Engine Facade
//!
//! The caller-owned object tying the pipeline together. Owns the only
//! pieces of state that outlive a single call: the active-alert set, the
//! classifier's block table, and the random-number source. The
//! presentation layer constructs one `Engine`, holds it for the process
//! lifetime, and invokes it on its own refresh cadence.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::alerts::{Alert, AlertEngine, TrafficSnapshot};
use crate::anomaly::{self, Anomaly};
use crate::attribution::{self, AddressSample, AttackState};
use crate::classify::{AddressClassifier, AddressStatus, TierBounds};
use crate::config::{ConfigError, EngineConfig};
use crate::constants::{ATTACKER_SLOTS, DETECTION_MULTIPLIER};
use crate::logfeed::{self, LogEntry};
use crate::synth::{self, SynthConfig, TrafficPoint, TrafficSeries};

/// One full simulation/evaluation pass, ready for rendering
#[derive(Debug, Serialize)]
pub struct CycleReport {
    pub series: TrafficSeries,
    pub samples: Vec<AddressSample>,
    pub anomalies: Vec<Anomaly>,
    pub new_alerts: Vec<Alert>,
    pub statuses: Vec<AddressStatus>,
}

/// Simulation & alerting engine
pub struct Engine {
    config: EngineConfig,
    alerts: AlertEngine,
    classifier: AddressClassifier,
    rng: StdRng,
}

impl Engine {
    /// Build an engine seeded from system entropy.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Build an engine with an explicit random source (deterministic when
    /// seeded, for tests and reproducible demos).
    pub fn with_rng(config: EngineConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let classifier = AddressClassifier::new(TierBounds::default(), config.block_duration_minutes);
        Ok(Self {
            config,
            alerts: AlertEngine::new(),
            classifier,
            rng,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Swap the configuration; the block table and alert set carry over.
    pub fn set_config(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Synthesis & attribution
    // ------------------------------------------------------------------

    /// Synthesize a traffic series ending now.
    pub fn synthesize_traffic(&mut self, synth: &SynthConfig) -> Result<TrafficSeries, ConfigError> {
        synth::synthesize_traffic(synth, Utc::now(), &mut self.rng)
    }

    /// Fixed address population for a run.
    pub fn generate_population(&mut self, count: usize) -> Vec<String> {
        attribution::generate_addresses(count, &mut self.rng)
    }

    /// Split one point across the population.
    pub fn attribute_addresses(
        &mut self,
        point: &TrafficPoint,
        population: &[String],
        attack: &AttackState,
    ) -> Result<Vec<AddressSample>, ConfigError> {
        attribution::attribute_addresses(point, population, attack, &mut self.rng)
    }

    // ------------------------------------------------------------------
    // Scoring, alerting, classification
    // ------------------------------------------------------------------

    /// Score samples against trailing baselines with the crate detection
    /// multiplier. The configured monitoring window is widened to cover
    /// several steps of the samples' own cadence, so a 60-second window
    /// still yields baselines for a series sampled every 5 minutes.
    pub fn score_anomalies(&self, samples: &[AddressSample]) -> Vec<Anomaly> {
        let configured = Duration::seconds(self.config.window_seconds as i64);
        let window = configured.max(anomaly::baseline_window(samples));
        anomaly::score_anomalies(samples, window, DETECTION_MULTIPLIER)
    }

    /// Evaluate a snapshot and merge new alerts into the active set.
    pub fn evaluate_alerts(&self, snapshot: &TrafficSnapshot) -> Result<Vec<Alert>, ConfigError> {
        self.alerts.evaluate(snapshot, self.config.alert_threshold)
    }

    pub fn dismiss_alert(&self, alert: &Alert) -> bool {
        self.alerts.dismiss(alert)
    }

    pub fn clear_alerts(&self) {
        self.alerts.clear_all()
    }

    /// Active alerts, newest first.
    pub fn active_alerts(&self) -> Vec<Alert> {
        self.alerts.active_sorted()
    }

    /// Classify samples at an explicit evaluation clock.
    pub fn classify_addresses_at(
        &mut self,
        samples: &[AddressSample],
        whitelist: &HashSet<String>,
        now: DateTime<Utc>,
    ) -> Vec<AddressStatus> {
        self.classifier.classify(samples, whitelist, now)
    }

    /// Classify samples against the wall clock.
    pub fn classify_addresses(
        &mut self,
        samples: &[AddressSample],
        whitelist: &HashSet<String>,
    ) -> Vec<AddressStatus> {
        self.classify_addresses_at(samples, whitelist, Utc::now())
    }

    /// Manually block an address for the configured duration.
    pub fn block_address(&mut self, address: &str) {
        self.classifier.block(address, Utc::now());
    }

    pub fn unblock_address(&mut self, address: &str) {
        self.classifier.unblock(address);
    }

    // ------------------------------------------------------------------
    // Dashboard feeds
    // ------------------------------------------------------------------

    /// Fully synthetic current-traffic snapshot.
    pub fn current_snapshot(&mut self) -> TrafficSnapshot {
        TrafficSnapshot::generate(Utc::now(), &mut self.rng)
    }

    /// Synthetic anomaly feed over the trailing range.
    pub fn generate_anomalies(&mut self, range_minutes: u32) -> Vec<Anomaly> {
        anomaly::generate_anomalies(Utc::now(), range_minutes, &mut self.rng)
    }

    /// Synthetic system-log feed for a date range.
    pub fn generate_logs(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<LogEntry> {
        logfeed::generate_logs(start, end, &mut self.rng)
    }

    // ------------------------------------------------------------------
    // Full pipeline
    // ------------------------------------------------------------------

    /// Run one complete pass: synthesize, attribute, score, alert on the
    /// latest point, classify. The attacker trio is drawn fresh per run,
    /// outside the regular population, as attack sources would be.
    pub fn run_cycle(
        &mut self,
        synth: &SynthConfig,
        population_size: usize,
        whitelist: &HashSet<String>,
    ) -> Result<CycleReport, ConfigError> {
        if population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }

        let end_time = Utc::now();
        let series = synth::synthesize_traffic(synth, end_time, &mut self.rng)?;
        let population = attribution::generate_addresses(population_size, &mut self.rng);
        let attackers = if series.attack.is_some() {
            attribution::generate_addresses(ATTACKER_SLOTS, &mut self.rng)
        } else {
            Vec::new()
        };

        let samples =
            attribution::attribute_series(&series, &population, &attackers, &mut self.rng)?;
        let anomalies = self.score_anomalies(&samples);

        let new_alerts = match series.points.last() {
            Some(last) => {
                let latest: Vec<AddressSample> = samples
                    .iter()
                    .filter(|s| s.timestamp == last.timestamp)
                    .cloned()
                    .collect();
                let snapshot = TrafficSnapshot::from_samples(last.timestamp, &latest);
                self.evaluate_alerts(&snapshot)?
            }
            None => Vec::new(),
        };

        let statuses = self.classify_addresses_at(&samples, whitelist, end_time);

        log::debug!(
            "Cycle: {} points, {} samples, {} anomalies, {} new alerts",
            series.points.len(),
            samples.len(),
            anomalies.len(),
            new_alerts.len()
        );

        Ok(CycleReport {
            series,
            samples,
            anomalies,
            new_alerts,
            statuses,
        })
    }
}
