// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Identity -> address resolution.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{ProofFetchError, VerificationError};
use crate::proof::ProofDocument;
use crate::types::id::{Address, Identity};
use crate::types::snapshot::IdentityCache;
use crate::verify::verify;

/// Where proof documents come from.
#[async_trait]
pub trait ProofSource: Send + Sync {
    /// Fetches the proof published at the identity's conventional location.
    async fn fetch(&self, identity: &Identity) -> Result<ProofDocument, ProofFetchError>;
}

/// A source with nothing published: only cached identities resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProofs;

#[async_trait]
impl ProofSource for NoProofs {
    async fn fetch(&self, _identity: &Identity) -> Result<ProofDocument, ProofFetchError> {
        Err(ProofFetchError::NotFound)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DeferReason {
    ProofNotFound,
    FetchFailed(String),
    Rejected(String),
    /// Negative, non-finite or too large for the oracle's fixed point.
    InvalidScore(String),
}

impl std::fmt::Display for DeferReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeferReason::ProofNotFound => write!(f, "no proof published"),
            DeferReason::FetchFailed(e) => write!(f, "proof fetch failed: {}", e),
            DeferReason::Rejected(e) => write!(f, "proof rejected: {}", e),
            DeferReason::InvalidScore(e) => write!(f, "score cannot be posted: {}", e),
        }
    }
}

impl From<ProofFetchError> for DeferReason {
    fn from(e: ProofFetchError) -> Self {
        match e {
            ProofFetchError::NotFound => DeferReason::ProofNotFound,
            other => DeferReason::FetchFailed(other.to_string()),
        }
    }
}

impl From<VerificationError> for DeferReason {
    fn from(e: VerificationError) -> Self {
        DeferReason::Rejected(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Already in the cache; not re-verified.
    Cached(Address),
    /// Proven during this call and added to the cache.
    Verified(Address),
    Unresolved(DeferReason),
}

impl Resolution {
    pub fn address(&self) -> Option<Address> {
        match self {
            Resolution::Cached(a) | Resolution::Verified(a) => Some(*a),
            Resolution::Unresolved(_) => None,
        }
    }
}

pub struct IdentityResolver<'a, S: ProofSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: ProofSource + ?Sized> IdentityResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Resolves `identity`, consulting the cache first.
    ///
    /// A successful fresh verification is written into `cache`; that is the
    /// only way the cache changes during a pass. Failures leave it untouched.
    pub async fn resolve(&self, identity: &Identity, cache: &mut IdentityCache) -> Resolution {
        if let Some(address) = cache.get(identity) {
            return Resolution::Cached(address);
        }

        tracing::debug!("No cached address for {}, fetching proof", identity);
        let doc = match self.source.fetch(identity).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::info!("Proof for {} unavailable: {}", identity, e);
                return Resolution::Unresolved(e.into());
            }
        };

        match verify(identity, &doc) {
            Ok(address) => {
                tracing::info!("Verified proof: {} -> {}", identity, address);
                cache.insert(identity.clone(), address);
                Resolution::Verified(address)
            }
            Err(e) => {
                tracing::warn!("Rejected proof for {}: {}", identity, e);
                Resolution::Unresolved(e.into())
            }
        }
    }
}
