// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use async_trait::async_trait;
use credbridge_kernel::error::ProofFetchError;
use credbridge_kernel::proof::{ContentsEnvelope, ProofDocument};
use credbridge_kernel::resolver::ProofSource;
use credbridge_kernel::types::Identity;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

use crate::errors::NodeError;

/// Fetches proofs from `<api>/repos/<user>/<user>/contents/<file>`: the
/// user's profile repository, which only they can write to.
#[derive(Debug, Clone)]
pub struct GithubProofSource {
    base_url: Url,
    proof_file: String,
    token: Option<String>,
    client: Client,
}

impl GithubProofSource {
    pub fn new(
        base_url: &str,
        proof_file: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, NodeError> {
        let base_url: Url = base_url
            .parse()
            .map_err(|e| NodeError::Config(format!("GITHUB_API_URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(NodeError::Config(format!("GITHUB_API_URL: {} cannot hold a path", base_url)));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("credbridge-node/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NodeError::Network(e.to_string()))?;
        Ok(Self {
            base_url,
            proof_file: proof_file.to_string(),
            token,
            client,
        })
    }

    /// The identity is one percent-encoded path segment, so `/`, `?` or `#`
    /// in it can never point the request at another resource.
    pub fn proof_url(&self, identity: &Identity) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", identity.as_str(), identity.as_str(), "contents"])
                .extend(self.proof_file.split('/').filter(|s| !s.is_empty()));
        }
        url
    }
}

#[async_trait]
impl ProofSource for GithubProofSource {
    async fn fetch(&self, identity: &Identity) -> Result<ProofDocument, ProofFetchError> {
        let url = self.proof_url(identity);
        let mut req = self.client.get(url).header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                ProofFetchError::Timeout
            } else {
                ProofFetchError::Network(e.to_string())
            }
        })?;

        match resp.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(ProofFetchError::NotFound),
            other => return Err(ProofFetchError::Network(format!("unexpected status {}", other))),
        }

        let envelope: ContentsEnvelope = resp
            .json()
            .await
            .map_err(|e| ProofFetchError::Envelope(e.to_string()))?;
        envelope.into_document()
    }
}
