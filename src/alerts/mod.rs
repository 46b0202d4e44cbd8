//! Alert Engine
//!
//! Classifies traffic snapshots into severity tiers and maintains the
//! deduplicated set of active alerts. Alerts live until dismissed or
//! cleared; they are never silently expired.
//!
//! Identity for deduplication is the `(severity, message, address)` tuple;
//! the timestamp does not participate. All read-modify-write sequences on
//! the active set happen inside a single lock scope so racing triggers
//! cannot break the dedup invariant.

pub mod snapshot;
#[cfg(test)]
mod tests;

pub use snapshot::TrafficSnapshot;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

// ============================================================================
// TYPES
// ============================================================================

/// Severity tier of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Address marker for aggregate (non-per-address) alerts
pub const MULTIPLE_ADDRESSES: &str = "multiple";

/// One active alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub message: String,
    pub address: String,
}

impl Alert {
    /// Dedup identity: severity + message + address. Timestamp excluded.
    pub fn same_identity(&self, other: &Alert) -> bool {
        self.severity == other.severity
            && self.message == other.message
            && self.address == other.address
    }
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Classify a snapshot against the threshold, without touching any state.
///
/// Emits one aggregate critical alert when the total rate exceeds three
/// times the threshold, then one alert per hot address: warning strictly
/// below twice the threshold, critical at or above it.
pub fn check_alerts(
    snapshot: &TrafficSnapshot,
    threshold: u64,
) -> Result<Vec<Alert>, ConfigError> {
    if threshold == 0 {
        return Err(ConfigError::ZeroThreshold);
    }

    let mut alerts = Vec::new();

    if snapshot.total_requests_per_minute > threshold * 3 {
        alerts.push(Alert {
            timestamp: snapshot.timestamp,
            severity: Severity::Critical,
            message: format!(
                "CRITICAL: Extremely high traffic volume detected ({} requests/min)",
                snapshot.total_requests_per_minute
            ),
            address: MULTIPLE_ADDRESSES.to_string(),
        });
    }

    // Deterministic emission order for the per-address alerts
    let mut hot: Vec<(&String, &u64)> = snapshot
        .address_requests
        .iter()
        .filter(|(_, &r)| r > threshold)
        .collect();
    hot.sort_by(|a, b| a.0.cmp(b.0));

    for (address, &requests) in hot {
        // Boundary at exactly 2x threshold is critical
        let severity = if requests < threshold * 2 {
            Severity::Warning
        } else {
            Severity::Critical
        };
        let label = match severity {
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        };
        alerts.push(Alert {
            timestamp: snapshot.timestamp,
            severity,
            message: format!(
                "{}: High traffic from {} ({} requests/min)",
                label, address, requests
            ),
            address: address.clone(),
        });
    }

    Ok(alerts)
}

// ============================================================================
// ENGINE
// ============================================================================

/// Stateful store of active alerts
#[derive(Debug, Default)]
pub struct AlertEngine {
    active: Mutex<Vec<Alert>>,
}

impl AlertEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify the snapshot and merge the results into the active set.
    /// Returns only the alerts that were actually new.
    pub fn evaluate(
        &self,
        snapshot: &TrafficSnapshot,
        threshold: u64,
    ) -> Result<Vec<Alert>, ConfigError> {
        let candidates = check_alerts(snapshot, threshold)?;
        let appended = self.merge(candidates);
        if !appended.is_empty() {
            log::warn!(
                "{} new alert(s) at threshold {} (total {}/min)",
                appended.len(),
                threshold,
                snapshot.total_requests_per_minute
            );
        }
        Ok(appended)
    }

    /// Append alerts not already present under the identity rule.
    /// Check-then-append runs under one lock.
    pub fn merge(&self, candidates: Vec<Alert>) -> Vec<Alert> {
        let mut active = self.active.lock();
        let mut appended = Vec::new();
        for alert in candidates {
            let duplicate = active.iter().any(|a| a.same_identity(&alert))
                || appended.iter().any(|a: &Alert| a.same_identity(&alert));
            if !duplicate {
                active.push(alert.clone());
                appended.push(alert);
            }
        }
        appended
    }

    /// Remove one matching alert. Removing an absent alert is a no-op.
    pub fn dismiss(&self, alert: &Alert) -> bool {
        let mut active = self.active.lock();
        if let Some(idx) = active.iter().position(|a| a.same_identity(alert)) {
            active.remove(idx);
            true
        } else {
            false
        }
    }

    /// Drop every active alert.
    pub fn clear_all(&self) {
        let mut active = self.active.lock();
        let dropped = active.len();
        active.clear();
        if dropped > 0 {
            log::info!("Cleared {} active alert(s)", dropped);
        }
    }

    /// Active alerts in display order: newest timestamp first.
    pub fn active_sorted(&self) -> Vec<Alert> {
        let mut alerts = self.active.lock().clone();
        alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        alerts
    }

    pub fn len(&self) -> usize {
        self.active.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.lock().is_empty()
    }
}
