// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Score snapshots and the identity cache.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::error::{KernelError, Result};
use crate::types::id::{Address, Identity};

/// Identity -> score, as produced by one run of the scoring pipeline.
///
/// Ordered by identity, not by the key order of the scorer's output, so a
/// pass over the same inputs always visits identities, and emits scores,
/// in the same order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreSnapshot {
    scores: BTreeMap<Identity, f64>,
}

impl ScoreSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identity: &Identity) -> Option<f64> {
        self.scores.get(identity).copied()
    }

    pub fn insert(&mut self, identity: Identity, score: f64) {
        self.scores.insert(identity, score);
    }

    pub fn remove(&mut self, identity: &Identity) -> Option<f64> {
        self.scores.remove(identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identity, f64)> {
        self.scores.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| KernelError::InvalidSnapshot(e.to_string()))
    }

    pub fn to_json(&self) -> Vec<u8> {
        serde_json::to_vec_pretty(self).unwrap_or_default()
    }
}

impl<I: Into<Identity>> FromIterator<(I, f64)> for ScoreSnapshot {
    fn from_iter<T: IntoIterator<Item = (I, f64)>>(iter: T) -> Self {
        Self {
            scores: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Scores arrive either as JSON numbers or as numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScore {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for ScoreSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<Identity, RawScore>::deserialize(deserializer)?;
        let mut scores = BTreeMap::new();
        for (identity, value) in raw {
            let score = match value {
                RawScore::Number(n) => n,
                RawScore::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                    serde::de::Error::custom(format!("score for '{}' is not numeric: {:?}", identity, s))
                })?,
            };
            if !score.is_finite() {
                return Err(serde::de::Error::custom(format!(
                    "score for '{}' is not finite: {}",
                    identity, score
                )));
            }
            scores.insert(identity, score);
        }
        Ok(Self { scores })
    }
}

/// Identity -> address mappings that have already been proven.
///
/// Entries are only ever added. An entry is trusted as-is on every later
/// pass; it is never re-verified.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityCache {
    entries: BTreeMap<Identity, Address>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identity: &Identity) -> Option<Address> {
        self.entries.get(identity).copied()
    }

    pub(crate) fn insert(&mut self, identity: Identity, address: Address) {
        self.entries.insert(identity, address);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identity, &Address)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| KernelError::InvalidSnapshot(e.to_string()))
    }

    pub fn to_json(&self) -> Vec<u8> {
        // A map of strings always serializes.
        serde_json::to_vec_pretty(self).unwrap_or_default()
    }
}

impl<I: Into<Identity>> FromIterator<(I, Address)> for IdentityCache {
    fn from_iter<T: IntoIterator<Item = (I, Address)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
