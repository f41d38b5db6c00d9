// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

use crate::types::id::Address;

/// Why a proof document was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// The signature does not recover to the address the payload claims.
    #[error("signature recovers to {recovered}, payload claims {claimed}")]
    SignatureMismatch { recovered: String, claimed: String },
    /// The proof is bound to a different identity than the one being resolved.
    #[error("proof is for '{proven}', not '{claimed}'")]
    IdentityMismatch { claimed: String, proven: String },
    #[error("malformed proof: {0}")]
    MalformedProof(String),
}

/// Failure to obtain a proof document for an identity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofFetchError {
    #[error("no proof published")]
    NotFound,
    #[error("proof fetch failed: {0}")]
    Network(String),
    #[error("proof fetch timed out")]
    Timeout,
    #[error("undecodable proof envelope: {0}")]
    Envelope(String),
}

/// Inconsistencies detected while turning a plan into oracle calls.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// The address has no feed in the freshly read feed list.
    #[error("no feed index for address {0}")]
    FeedIndexNotFound(Address),
    #[error("score {score} for {address} cannot be scaled: {reason}")]
    Score {
        address: Address,
        score: f64,
        reason: ScoreError,
    },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreError {
    #[error("not a finite number")]
    NonFinite,
    #[error("negative")]
    Negative,
    #[error("exceeds the fixed-point range")]
    Overflow,
}

/// Errors surfaced by an oracle implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("oracle read failed: {0}")]
    Read(String),
    #[error("oracle write failed: {0}")]
    Write(String),
    #[error("oracle call timed out after {0}s")]
    Timeout(u64),
}

#[derive(Error, Debug)]
pub enum KernelError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

pub type KernelResult<T> = std::result::Result<T, KernelError>;
pub type Result<T> = KernelResult<T>;
