//! Address Classifier
//!
//! Assigns each address a status from its request volume and the tier
//! boundaries. Volume tiers (normal / suspicious) are recomputed wholesale
//! on every call; blocks are stateful: once an address crosses the
//! critical bound its block-start timestamp is recorded and the address
//! stays blocked until the configured duration expires, even if its
//! volume drops in the meantime.
//!
//! Whitelisting is an external fact supplied by the caller and always
//! overrides volume-based classification; it is never inferred from
//! traffic.


use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::attribution::AddressSample;
use crate::constants::{CRITICAL_BOUND, SUSPICIOUS_BOUND};

// ============================================================================
// TYPES
// ============================================================================

/// Mutually exclusive address status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Normal,
    Suspicious,
    Blocked,
    Whitelisted,
}

/// Current status of one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressStatus {
    pub address: String,
    pub status: Status,
    pub requests: u64,
}

/// Volume boundaries between tiers
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierBounds {
    /// Above this an address is suspicious (requests/min)
    pub suspicious: u64,
    /// Above this an address is blocked (requests/min)
    pub critical: u64,
}

impl Default for TierBounds {
    fn default() -> Self {
        Self {
            suspicious: SUSPICIOUS_BOUND,
            critical: CRITICAL_BOUND,
        }
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Stateful classifier owning the block table
#[derive(Debug)]
pub struct AddressClassifier {
    bounds: TierBounds,
    block_duration: Duration,
    /// Block-start timestamp per blocked address
    blocks: HashMap<String, DateTime<Utc>>,
}

impl AddressClassifier {
    pub fn new(bounds: TierBounds, block_duration_minutes: u64) -> Self {
        Self {
            bounds,
            block_duration: Duration::minutes(block_duration_minutes as i64),
            blocks: HashMap::new(),
        }
    }

    /// Classify attributed samples. Requests are aggregated per address;
    /// the result holds one entry per unique address, sorted by address.
    ///
    /// `now` is the evaluation clock; expired blocks are dropped against it
    /// before tiers are applied.
    pub fn classify(
        &mut self,
        samples: &[AddressSample],
        whitelist: &HashSet<String>,
        now: DateTime<Utc>,
    ) -> Vec<AddressStatus> {
        self.expire_blocks(now);

        let mut totals: HashMap<&str, u64> = HashMap::new();
        for s in samples {
            *totals.entry(s.address.as_str()).or_default() += s.requests;
        }

        let mut statuses: Vec<AddressStatus> = totals
            .into_iter()
            .map(|(address, requests)| AddressStatus {
                status: self.classify_one(address, requests, whitelist, now),
                address: address.to_string(),
                requests,
            })
            .collect();
        statuses.sort_by(|a, b| a.address.cmp(&b.address));
        statuses
    }

    /// Status of a single address at `now`. Records a new block when the
    /// critical bound is crossed; an existing block's timer is not
    /// refreshed by further volume.
    pub fn classify_one(
        &mut self,
        address: &str,
        requests: u64,
        whitelist: &HashSet<String>,
        now: DateTime<Utc>,
    ) -> Status {
        if whitelist.contains(address) {
            return Status::Whitelisted;
        }

        if requests > self.bounds.critical {
            if !self.blocks.contains_key(address) {
                self.blocks.insert(address.to_string(), now);
                log::info!(
                    "Address {} automatically blocked: exceeded threshold with {} requests/min",
                    address,
                    requests
                );
            }
            return Status::Blocked;
        }

        if self.is_blocked(address, now) {
            return Status::Blocked;
        }

        if requests > self.bounds.suspicious {
            Status::Suspicious
        } else {
            Status::Normal
        }
    }

    /// Whether an unexpired block exists for the address.
    pub fn is_blocked(&self, address: &str, now: DateTime<Utc>) -> bool {
        self.blocks
            .get(address)
            .map(|start| now - *start < self.block_duration)
            .unwrap_or(false)
    }

    /// Manually block an address starting at `now`.
    pub fn block(&mut self, address: &str, now: DateTime<Utc>) {
        self.blocks.insert(address.to_string(), now);
        log::info!("Address {} manually blocked", address);
    }

    /// Lift a block early. Unknown addresses are a no-op.
    pub fn unblock(&mut self, address: &str) {
        if self.blocks.remove(address).is_some() {
            log::info!("Address {} manually unblocked", address);
        }
    }

    /// Drop the entire block table.
    pub fn clear_blocks(&mut self) {
        self.blocks.clear();
    }

    pub fn blocked_count(&self, now: DateTime<Utc>) -> usize {
        self.blocks
            .values()
            .filter(|start| now - **start < self.block_duration)
            .count()
    }

    /// Drop blocks whose duration has elapsed.
    fn expire_blocks(&mut self, now: DateTime<Utc>) {
        let duration = self.block_duration;
        let before = self.blocks.len();
        self.blocks.retain(|address, start| {
            let keep = now - *start < duration;
            if !keep {
                log::info!("Address {} automatically unblocked: block duration expired", address);
            }
            keep
        });
        if before != self.blocks.len() {
            log::debug!("Expired {} block(s)", before - self.blocks.len());
        }
    }
}
