//! Engine Configuration
//!
//! Caller-supplied knobs for alerting and blocking. The engine never
//! persists configuration; it is consumed per call.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ALERT_THRESHOLD, DEFAULT_BLOCK_DURATION_MINUTES, DEFAULT_WINDOW_SECONDS,
};

// ============================================================================
// ERRORS
// ============================================================================

/// Invalid input to the engine or one of its pure functions.
/// Fail-fast: never retried, always surfaced to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroThreshold,
    ZeroWindow,
    ZeroBlockDuration,
    EmptyPopulation,
    InvalidRatio(f64),
    InvalidProbability(f64),
    /// A statistical distribution rejected its construction parameter
    InvalidDistribution(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroThreshold => write!(f, "alert threshold must be positive"),
            ConfigError::ZeroWindow => write!(f, "monitoring window must be positive"),
            ConfigError::ZeroBlockDuration => write!(f, "block duration must be positive"),
            ConfigError::EmptyPopulation => write!(f, "address population must be non-empty"),
            ConfigError::InvalidRatio(r) => write!(f, "concentration ratio out of (0,1): {}", r),
            ConfigError::InvalidProbability(p) => write!(f, "probability out of [0,1]: {}", p),
            ConfigError::InvalidDistribution(param) => {
                write!(f, "invalid distribution parameter: {}", param)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// CONFIG
// ============================================================================

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Per-address alert threshold (requests/min)
    pub alert_threshold: u64,

    /// Trailing monitoring window (seconds)
    pub window_seconds: u64,

    /// How long a block sticks once triggered (minutes)
    pub block_duration_minutes: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            window_seconds: DEFAULT_WINDOW_SECONDS,
            block_duration_minutes: DEFAULT_BLOCK_DURATION_MINUTES,
        }
    }
}

impl EngineConfig {
    pub fn new(alert_threshold: u64) -> Self {
        Self {
            alert_threshold,
            ..Default::default()
        }
    }

    /// Validate all fields. Zero values are configuration errors, not
    /// "disable" switches.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alert_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.window_seconds == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.block_duration_minutes == 0 {
            return Err(ConfigError::ZeroBlockDuration);
        }
        Ok(())
    }
}
