//! NetShield Core - Synthetic Traffic & Anomaly Alerting Engine
//!
//! Simulates network request traffic, attributes it to source addresses,
//! classifies addresses by behavior, and raises alerts when traffic crosses
//! configured thresholds. Built to exercise a monitoring dashboard under
//! realistic-looking load and attack conditions; the dashboard itself is a
//! separate consumer of these records.
//!
//! ## Pipeline
//! `synth` (traffic series) -> `attribution` (per-address samples) ->
//! `anomaly` / `alerts` / `classify` -> presentation layer.
//!
//! The `engine::Engine` facade owns all cross-call state (active alerts,
//! block table, random source) and is the intended entry point.

pub mod constants;

pub mod alerts;
pub mod anomaly;
pub mod attribution;
pub mod classify;
pub mod config;
pub mod engine;
pub mod logfeed;
pub mod sampler;
pub mod synth;

pub use alerts::{Alert, AlertEngine, Severity, TrafficSnapshot};
pub use anomaly::Anomaly;
pub use attribution::{AddressSample, AttackState};
pub use classify::{AddressStatus, Status, TierBounds};
pub use config::{ConfigError, EngineConfig};
pub use engine::{CycleReport, Engine};
pub use synth::{AttackWindow, SynthConfig, TrafficPoint, TrafficSeries};
