// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use alloy::network::EthereumWallet;
use alloy::primitives::utils::format_ether;
use alloy::primitives::U256;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use credbridge_kernel::error::OracleError;
use credbridge_kernel::oracle::Oracle;
use credbridge_kernel::planner::{CreateFeedsCall, SubmitScoresCall};
use credbridge_kernel::types::{Address, FeedList};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::NodeConfig;
use crate::errors::NodeError;

sol! {
    #[sol(rpc)]
    interface ICredOracle {
        function getFeedLength() external view returns (uint256);
        function getFeedList(uint256[] memory feedIDs) external view returns (
            string[] memory names,
            uint256[] memory decimals,
            uint256[] memory timeslots,
            uint256[] memory revenueModes,
            uint256[] memory costs
        );
        function createNewFeeds(
            string[] memory names,
            string[] memory descriptions,
            uint256[] memory decimals,
            uint256[] memory revenueModes,
            uint256[] memory timeslots,
            uint256[] memory costs
        ) external;
        function submitFeed(uint256[] memory feedIDs, uint256[] memory values) external;
    }
}

sol! {
    #[sol(rpc)]
    interface IInstantDistributionAgreement {
        function getSubscription(address token, address publisher, uint32 indexId, address subscriber)
            external view returns (bool exist, bool approved, uint128 units, uint256 pendingDistribution);
    }
}

fn parse_chain_address(name: &str, value: Option<&str>) -> Result<alloy::primitives::Address, NodeError> {
    let raw = value.ok_or_else(|| NodeError::Config(format!("{} is required", name)))?;
    raw.parse::<Address>()
        .map(|a| a.0)
        .map_err(|e| NodeError::Config(format!("{}: {}", name, e)))
}

fn parse_rpc_url(raw: &str) -> Result<Url, NodeError> {
    raw.parse().map_err(|e| NodeError::Config(format!("RPC_URL: {}", e)))
}

async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, OracleError>
where
    F: Future<Output = Result<T, OracleError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| OracleError::Timeout(limit.as_secs()))?
}

/// Bounds every call of the wrapped oracle, reads included. Expiry is
/// [`OracleError::Timeout`], which fails the pass like any other oracle error.
pub struct BoundedOracle {
    inner: Arc<dyn Oracle>,
    limit: Duration,
}

impl BoundedOracle {
    pub fn new(inner: Arc<dyn Oracle>, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl Oracle for BoundedOracle {
    async fn feed_length(&self) -> Result<u64, OracleError> {
        bounded(self.limit, self.inner.feed_length()).await
    }

    async fn feed_list(&self, indices: &[u64]) -> Result<FeedList, OracleError> {
        bounded(self.limit, self.inner.feed_list(indices)).await
    }

    async fn create_new_feeds(&self, call: &CreateFeedsCall) -> Result<(), OracleError> {
        bounded(self.limit, self.inner.create_new_feeds(call)).await
    }

    async fn submit_feed(&self, call: &SubmitScoresCall) -> Result<(), OracleError> {
        bounded(self.limit, self.inner.submit_feed(call)).await
    }
}

/// The feed registry contract, written through a local signing key.
/// Calls wait until mined; wrap in [`BoundedOracle`] to limit them.
pub struct ChainOracle {
    contract: ICredOracle::ICredOracleInstance<DynProvider>,
}

impl ChainOracle {
    pub fn connect(cfg: &NodeConfig) -> Result<Self, NodeError> {
        let key = cfg
            .signer_private_key
            .as_deref()
            .ok_or_else(|| NodeError::Config("SIGNER_PRIVATE_KEY is required".into()))?;
        let signer: PrivateKeySigner = key
            .trim()
            .parse()
            .map_err(|e| NodeError::Config(format!("SIGNER_PRIVATE_KEY: {}", e)))?;
        tracing::info!("Oracle writes signed by {}", Address(signer.address()));

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(parse_rpc_url(&cfg.rpc_url)?)
            .erased();
        let address = parse_chain_address("ORACLE_ADDRESS", cfg.oracle_address.as_deref())?;

        Ok(Self {
            contract: ICredOracle::new(address, provider),
        })
    }
}

#[async_trait]
impl Oracle for ChainOracle {
    async fn feed_length(&self) -> Result<u64, OracleError> {
        let len = self
            .contract
            .getFeedLength()
            .call()
            .await
            .map_err(|e| OracleError::Read(e.to_string()))?;
        u64::try_from(len).map_err(|_| OracleError::Read(format!("feed length {} out of range", len)))
    }

    async fn feed_list(&self, indices: &[u64]) -> Result<FeedList, OracleError> {
        let ids: Vec<U256> = indices.iter().map(|i| U256::from(*i)).collect();
        let ret = self
            .contract
            .getFeedList(ids)
            .call()
            .await
            .map_err(|e| OracleError::Read(e.to_string()))?;
        Ok(FeedList::from_columns(ret.names, ret.decimals, ret.timeslots, ret.revenueModes, ret.costs))
    }

    async fn create_new_feeds(&self, call: &CreateFeedsCall) -> Result<(), OracleError> {
        let pending = self
            .contract
            .createNewFeeds(
                call.names.clone(),
                call.labels.clone(),
                call.decimals.clone(),
                call.revenue_modes.clone(),
                call.timeslots.clone(),
                call.costs.clone(),
            )
            .send()
            .await
            .map_err(|e| OracleError::Write(e.to_string()))?;
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| OracleError::Write(e.to_string()))?;
        if !receipt.status() {
            return Err(OracleError::Write(format!("createNewFeeds reverted in {}", receipt.transaction_hash)));
        }
        tracing::info!("createNewFeeds mined in {}", receipt.transaction_hash);
        Ok(())
    }

    async fn submit_feed(&self, call: &SubmitScoresCall) -> Result<(), OracleError> {
        let pending = self
            .contract
            .submitFeed(call.feed_ids.clone(), call.values.clone())
            .send()
            .await
            .map_err(|e| OracleError::Write(e.to_string()))?;
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| OracleError::Write(e.to_string()))?;
        if !receipt.status() {
            return Err(OracleError::Write(format!("submitFeed reverted in {}", receipt.transaction_hash)));
        }
        tracing::info!("submitFeed mined in {}", receipt.transaction_hash);
        Ok(())
    }
}

/// Reads how much of the cred distribution each address has pending.
#[async_trait]
pub trait DistributionReader: Send + Sync {
    /// Pending amount in whole token units.
    async fn pending(&self, subscriber: &Address) -> Result<f64, NodeError>;
}

pub struct IdaReader {
    contract: IInstantDistributionAgreement::IInstantDistributionAgreementInstance<DynProvider>,
    token: alloy::primitives::Address,
    publisher: alloy::primitives::Address,
    index_id: u32,
    timeout: Duration,
}

impl IdaReader {
    /// `None` when no distribution contract is configured.
    pub fn connect(cfg: &NodeConfig) -> Result<Option<Self>, NodeError> {
        if cfg.ida_address.is_none() {
            return Ok(None);
        }
        let provider = ProviderBuilder::new().connect_http(parse_rpc_url(&cfg.rpc_url)?).erased();
        let ida = parse_chain_address("IDA_ADDRESS", cfg.ida_address.as_deref())?;
        let publisher = parse_chain_address("CORTEX_ADDRESS", cfg.ida_publisher.as_deref())?;
        Ok(Some(Self {
            contract: IInstantDistributionAgreement::new(ida, provider),
            token: parse_chain_address("IDA_TOKEN", cfg.ida_token.as_deref())?,
            publisher,
            index_id: cfg.ida_index_id,
            timeout: cfg.oracle_timeout(),
        }))
    }
}

#[async_trait]
impl DistributionReader for IdaReader {
    async fn pending(&self, subscriber: &Address) -> Result<f64, NodeError> {
        let sub = bounded(self.timeout, async {
            self.contract
                .getSubscription(self.token, self.publisher, self.index_id, subscriber.0)
                .call()
                .await
                .map_err(|e| OracleError::Read(e.to_string()))
        })
        .await?;
        format_ether(sub.pendingDistribution)
            .parse::<f64>()
            .map_err(|e| NodeError::Network(format!("pending distribution: {}", e)))
    }
}
