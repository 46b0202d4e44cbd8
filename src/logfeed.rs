//! Synthetic System-Log Feed
//!
//! Generates the block/unblock/traffic log entries the dashboard's history
//! tab shows for a date range. Entry volume scales with the span; kinds
//! follow a fixed weighting heavily tilted toward routine info lines.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Log entries generated per day of range
const MIN_ENTRIES_PER_DAY: u32 = 20;
const MAX_ENTRIES_PER_DAY: u32 = 50;

/// Relative weights: info, warning, error, block, unblock
const KIND_WEIGHTS: [u32; 5] = [50, 20, 10, 15, 5];

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Warning,
    Error,
    Block,
    Unblock,
}

const ALL_KINDS: [LogKind; 5] = [
    LogKind::Info,
    LogKind::Warning,
    LogKind::Error,
    LogKind::Block,
    LogKind::Unblock,
];

/// One synthetic log line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: LogKind,
    pub address: String,
    pub message: String,
}

// ============================================================================
// GENERATION
// ============================================================================

/// Generate log entries covering `[start, end]`, newest first.
///
/// An inverted or empty range yields an empty feed.
pub fn generate_logs<R: Rng>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    rng: &mut R,
) -> Vec<LogEntry> {
    let span = end - start;
    let span_seconds = span.num_seconds();
    if span_seconds <= 0 {
        return Vec::new();
    }

    let days = (span.num_days() + 1) as u32;
    let count = days * rng.gen_range(MIN_ENTRIES_PER_DAY..=MAX_ENTRIES_PER_DAY);

    // Weights are a non-empty constant table, so this cannot fail
    let kind_index = match WeightedIndex::new(KIND_WEIGHTS) {
        Ok(dist) => dist,
        Err(_) => return Vec::new(),
    };

    let mut entries: Vec<LogEntry> = (0..count)
        .map(|_| {
            let timestamp = start + Duration::seconds(rng.gen_range(0..span_seconds));
            let kind = ALL_KINDS[kind_index.sample(rng)];
            let address = format!(
                "192.168.{}.{}",
                rng.gen_range(1..=255u16),
                rng.gen_range(1..=255u16)
            );
            let message = message_for(kind, &address, rng);
            LogEntry {
                timestamp,
                kind,
                address,
                message,
            }
        })
        .collect();

    // Newest first, as the history tab displays them
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}

fn message_for<R: Rng>(kind: LogKind, address: &str, rng: &mut R) -> String {
    match kind {
        LogKind::Info => format!(
            "Normal traffic from {}: {} requests/min",
            address,
            rng.gen_range(1..50)
        ),
        LogKind::Warning => format!(
            "Unusual traffic spike from {}: {} requests/min",
            address,
            rng.gen_range(50..100)
        ),
        LogKind::Error => format!(
            "Potential DDoS attack detected from {}: {} requests/min",
            address,
            rng.gen_range(100..500)
        ),
        LogKind::Block => format!(
            "IP {} automatically blocked: Exceeded threshold with {} requests/min",
            address,
            rng.gen_range(100..500)
        ),
        LogKind::Unblock => format!("IP {} automatically unblocked: Block duration expired", address),
    }
}
