//! Central Configuration Constants
//!
//! Single source of truth for all simulation and detection defaults.
//! To retune the engine, only edit this file.

/// Default alert threshold (requests/min)
pub const DEFAULT_ALERT_THRESHOLD: u64 = 100;

/// Default monitoring window (seconds)
pub const DEFAULT_WINDOW_SECONDS: u64 = 60;

/// Default block duration (minutes)
pub const DEFAULT_BLOCK_DURATION_MINUTES: u64 = 60;

/// Boundary above which an address is suspicious (requests/min)
pub const SUSPICIOUS_BOUND: u64 = 100;

/// Boundary above which an address is blocked (requests/min)
pub const CRITICAL_BOUND: u64 = 200;

/// Observed/expected ratio above which a sample is anomalous.
/// Matches the 5-20x band the synthesizer injects, so generator and
/// detector agree on what counts as an attack.
pub const DETECTION_MULTIPLIER: f64 = 5.0;

/// Trailing sampling steps the anomaly baseline must cover. The scorer
/// widens a too-narrow monitoring window to this many steps of the
/// samples' own cadence so sparse series still carry a baseline.
pub const BASELINE_WINDOW_STEPS: i32 = 6;

/// Floor for synthesized traffic (requests/min)
pub const MIN_TRAFFIC: u64 = 20;

/// Baseline traffic level before the diurnal curve is applied
pub const BASE_TRAFFIC: f64 = 100.0;

/// Amplitude of the diurnal curve (requests/min at full intensity)
pub const DIURNAL_AMPLITUDE: f64 = 50.0;

/// Standard deviation of per-step traffic jitter
pub const JITTER_STDDEV: f64 = 10.0;

/// Zipf shape for the normal per-address split
pub const ZIPF_SHAPE: f64 = 1.6;

/// Smallest / largest per-point address subset
pub const MIN_SUBSET: usize = 5;
pub const MAX_SUBSET: usize = 20;

/// Attacker addresses active during an attack window
pub const ATTACKER_SLOTS: usize = 3;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "NetShield";
