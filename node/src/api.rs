// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use credbridge_kernel::reconcile::Deferred;
use credbridge_kernel::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of one reconciliation pass, returned by the webhook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PassReport {
    pub identities_scored: usize,
    pub scores_posted: usize,
    pub feeds_created: usize,
    /// Identities proven and added to the cache during this pass.
    pub newly_verified: usize,
    pub deferred: Vec<DeferredIdentity>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeferredIdentity {
    pub identity: String,
    pub reason: String,
}

impl From<&Deferred> for DeferredIdentity {
    fn from(d: &Deferred) -> Self {
        Self {
            identity: d.identity.to_string(),
            reason: d.reason.to_string(),
        }
    }
}

/// One identity's row on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardEntry {
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<f64>,
}

pub type DashboardResponse = BTreeMap<String, DashboardEntry>;
