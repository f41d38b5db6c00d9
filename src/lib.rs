// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! credbridge-kernel: reconciles cred score snapshots against an on-chain
//! oracle's feed registry.
//!
//! Given the previous and current score snapshots, the identity cache and
//! the oracle's feed list, [`reconcile::reconcile`] decides which scores to
//! post and which addresses need a feed first, resolving identities to
//! addresses through signed proofs. [`planner`] turns that decision into
//! the oracle's batched write calls. All I/O sits behind the
//! [`resolver::ProofSource`] and [`oracle::Oracle`] traits.

pub mod config;
pub mod error;
pub mod fxp;
pub mod types;
pub mod proof;
pub mod verify;
pub mod differ;
pub mod matcher;
pub mod resolver;
pub mod reconcile;
pub mod oracle;
pub mod planner;

pub use reconcile::{reconcile, ReconciliationPlan};
