//! NetShield Demo - Command-Line Pipeline Driver
//!
//! Stands in for the dashboard: runs one full simulation/evaluation cycle
//! and prints the resulting records as JSON. Seed the run with
//! `NETSHIELD_SEED` for a reproducible demo; control log verbosity with
//! `RUST_LOG` as usual.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use netshield_core::constants::APP_VERSION;
use netshield_core::engine::Engine;
use netshield_core::synth::SynthConfig;
use netshield_core::EngineConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("NetShield engine v{}", APP_VERSION);

    let config = EngineConfig::default();
    let mut engine = match seed_from_env() {
        Some(seed) => {
            log::info!("Seeded run: {}", seed);
            Engine::with_rng(config, StdRng::seed_from_u64(seed))
        }
        None => Engine::new(config),
    }
    .expect("default config is valid");

    let synth = SynthConfig {
        attack_probability: 0.8,
        ..Default::default()
    };

    let report = match engine.run_cycle(&synth, 100, &HashSet::new()) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Cycle failed: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "Synthesized {} points ({} attack), {} samples, {} anomalies, {} new alerts",
        report.series.points.len(),
        if report.series.attack.is_some() { "with" } else { "no" },
        report.samples.len(),
        report.anomalies.len(),
        report.new_alerts.len()
    );

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Serialization failed: {}", e),
    }
}

fn seed_from_env() -> Option<u64> {
    std::env::var("NETSHIELD_SEED").ok()?.parse().ok()
}
