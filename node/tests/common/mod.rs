// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![allow(dead_code)]

use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use credbridge_kernel::config::ReconcileConfig;
use credbridge_kernel::error::{OracleError, ProofFetchError};
use credbridge_kernel::oracle::Oracle;
use credbridge_kernel::planner::{CreateFeedsCall, SubmitScoresCall};
use credbridge_kernel::proof::{ProofDocument, ProofPayload};
use credbridge_kernel::resolver::ProofSource;
use credbridge_kernel::types::{Address, FeedEntry, FeedList, Identity, ScoreSnapshot};
use credbridge_node::engine::PassEngine;
use credbridge_node::errors::NodeError;
use credbridge_node::network::BoundedOracle;
use credbridge_node::persistence::StateStore;
use credbridge_node::scoring::ScoreSource;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn address_of(signer: &PrivateKeySigner) -> Address {
    Address(signer.address())
}

pub fn signed_proof(signer: &PrivateKeySigner, username: &str) -> ProofDocument {
    let payload = serde_json::to_string(&ProofPayload {
        ethereum_address: address_of(signer).to_string(),
        github_username: username.to_string(),
    })
    .unwrap();
    let signature = signer.sign_message_sync(payload.as_bytes()).unwrap();
    ProofDocument {
        payload,
        signature: format!("0x{}", hex::encode(signature.as_bytes())),
    }
}

/// Feed registry held in memory. Writes can be made to fail.
#[derive(Default)]
pub struct MemoryOracle {
    pub feeds: Mutex<Vec<FeedEntry>>,
    pub submitted: Mutex<Vec<SubmitScoresCall>>,
    pub created: Mutex<Vec<CreateFeedsCall>>,
    pub fail_submit: AtomicBool,
    /// Submissions never complete.
    pub stall_submit: AtomicBool,
}

impl MemoryOracle {
    pub fn with_feeds(names: &[String]) -> Self {
        let oracle = Self::default();
        oracle
            .feeds
            .lock()
            .unwrap()
            .extend(names.iter().map(FeedEntry::named));
        oracle
    }

    pub fn feed_names(&self) -> Vec<String> {
        self.feeds.lock().unwrap().iter().map(|f| f.name.clone()).collect()
    }

    pub fn submissions(&self) -> Vec<SubmitScoresCall> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Oracle for MemoryOracle {
    async fn feed_length(&self) -> Result<u64, OracleError> {
        Ok(self.feeds.lock().unwrap().len() as u64)
    }

    async fn feed_list(&self, indices: &[u64]) -> Result<FeedList, OracleError> {
        let feeds = self.feeds.lock().unwrap();
        let picked = indices
            .iter()
            .map(|i| {
                feeds
                    .get(*i as usize)
                    .cloned()
                    .ok_or_else(|| OracleError::Read(format!("no feed {}", i)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FeedList::new(picked))
    }

    async fn create_new_feeds(&self, call: &CreateFeedsCall) -> Result<(), OracleError> {
        self.feeds
            .lock()
            .unwrap()
            .extend(call.names.iter().map(FeedEntry::named));
        self.created.lock().unwrap().push(call.clone());
        Ok(())
    }

    async fn submit_feed(&self, call: &SubmitScoresCall) -> Result<(), OracleError> {
        if self.stall_submit.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(OracleError::Write("execution reverted".into()));
        }
        self.submitted.lock().unwrap().push(call.clone());
        Ok(())
    }
}

/// Proofs keyed by identity.
#[derive(Default)]
pub struct MapProofs(pub HashMap<String, ProofDocument>);

#[async_trait]
impl ProofSource for MapProofs {
    async fn fetch(&self, identity: &Identity) -> Result<ProofDocument, ProofFetchError> {
        self.0.get(identity.as_str()).cloned().ok_or(ProofFetchError::NotFound)
    }
}

/// Returns whatever snapshot was last set.
#[derive(Default)]
pub struct FixedScores(pub Mutex<ScoreSnapshot>);

impl FixedScores {
    pub fn set(&self, scores: ScoreSnapshot) {
        *self.0.lock().unwrap() = scores;
    }
}

#[async_trait]
impl ScoreSource for FixedScores {
    async fn compute_scores(&self) -> Result<ScoreSnapshot, NodeError> {
        Ok(self.0.lock().unwrap().clone())
    }
}

pub struct Harness {
    pub oracle: Arc<MemoryOracle>,
    pub scores: Arc<FixedScores>,
    pub store: StateStore,
    pub engine: PassEngine,
    pub dir: tempfile::TempDir,
}

impl Harness {
    pub fn new(oracle: MemoryOracle, proofs: MapProofs) -> Self {
        Self::with_config(oracle, proofs, ReconcileConfig::default())
    }

    pub fn with_config(oracle: MemoryOracle, proofs: MapProofs, config: ReconcileConfig) -> Self {
        Self::build(oracle, proofs, config, |o| o)
    }

    /// Every oracle call from the engine goes through a time limit.
    pub fn bounded(oracle: MemoryOracle, proofs: MapProofs, limit: Duration) -> Self {
        Self::build(oracle, proofs, ReconcileConfig::default(), |o| {
            Arc::new(BoundedOracle::new(o, limit)) as Arc<dyn Oracle>
        })
    }

    fn build(
        oracle: MemoryOracle,
        proofs: MapProofs,
        config: ReconcileConfig,
        wrap: impl FnOnce(Arc<dyn Oracle>) -> Arc<dyn Oracle>,
    ) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(
            dir.path().join("cached-identities.json"),
            dir.path().join("credScores.json.old"),
        );
        let oracle = Arc::new(oracle);
        let scores = Arc::new(FixedScores::default());
        let engine = PassEngine::new(
            scores.clone(),
            Arc::new(proofs),
            wrap(oracle.clone()),
            store.clone(),
            config,
        );
        Self {
            oracle,
            scores,
            store,
            engine,
            dir,
        }
    }
}
