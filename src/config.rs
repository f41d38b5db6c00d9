// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

use serde::{Deserialize, Serialize};

/// Minimum score differential a pass acts on (exclusive).
/// Negative, so every scored identity is re-posted on every pass.
pub const DEFAULT_MIN_DIFFERENTIAL: f64 = -1.0;

/// Number of fractional decimal digits in the oracle's fixed-point scores.
pub const SCORE_DECIMALS: u32 = 18;

/// Metadata every newly created feed is registered with.
pub const FEED_LABEL: &str = "";
pub const FEED_DECIMALS: u64 = 18;
pub const FEED_REVENUE_MODE: u64 = 1;
pub const FEED_TIMESLOT: u64 = 0;
pub const FEED_COST: u64 = 0;

/// What happens to an identity whose score acted but whose address could not be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeferPolicy {
    /// Keep the previous history entry so the identity acts again next pass.
    #[default]
    Retry,
    /// Rotate history anyway; the identity waits for its next score change.
    Drop,
}

impl std::str::FromStr for DeferPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "retry" => Ok(DeferPolicy::Retry),
            "drop" => Ok(DeferPolicy::Drop),
            other => Err(format!("unknown defer policy '{}' (expected retry|drop)", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReconcileConfig {
    pub min_differential: f64,
    pub defer_policy: DeferPolicy,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            min_differential: DEFAULT_MIN_DIFFERENTIAL,
            defer_policy: DeferPolicy::default(),
        }
    }
}
