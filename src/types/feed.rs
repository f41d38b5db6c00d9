// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! The oracle's feed registry as seen by one read.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// One registered feed. Its index is its position in the [`FeedList`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Stored verbatim; for cred feeds this is the account address.
    pub name: String,
    pub decimals: U256,
    pub timeslot: U256,
    pub revenue_mode: U256,
    pub cost: U256,
}

impl FeedEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decimals: U256::ZERO,
            timeslot: U256::ZERO,
            revenue_mode: U256::ZERO,
            cost: U256::ZERO,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedList {
    entries: Vec<FeedEntry>,
}

impl FeedList {
    pub fn new(entries: Vec<FeedEntry>) -> Self {
        Self { entries }
    }

    /// Builds a list from the oracle's column-wise `getFeedList` result.
    /// Columns shorter than `names` are padded with zero.
    pub fn from_columns(
        names: Vec<String>,
        decimals: Vec<U256>,
        timeslots: Vec<U256>,
        revenue_modes: Vec<U256>,
        costs: Vec<U256>,
    ) -> Self {
        let col = |v: &Vec<U256>, i: usize| v.get(i).copied().unwrap_or(U256::ZERO);
        let entries = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| FeedEntry {
                name,
                decimals: col(&decimals, i),
                timeslot: col(&timeslots, i),
                revenue_mode: col(&revenue_modes, i),
                cost: col(&costs, i),
            })
            .collect();
        Self { entries }
    }

    /// Position of the first feed whose name is exactly `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FeedList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(FeedEntry::named).collect(),
        }
    }
}
