// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! The oracle contract as the core sees it.

use async_trait::async_trait;

use crate::error::OracleError;
use crate::planner::{CreateFeedsCall, SubmitScoresCall};
use crate::types::feed::FeedList;

#[async_trait]
pub trait Oracle: Send + Sync {
    async fn feed_length(&self) -> Result<u64, OracleError>;

    async fn feed_list(&self, indices: &[u64]) -> Result<FeedList, OracleError>;

    /// Registers new feeds. Returns once the write is final.
    async fn create_new_feeds(&self, call: &CreateFeedsCall) -> Result<(), OracleError>;

    /// Posts values to existing feeds. Returns once the write is final.
    async fn submit_feed(&self, call: &SubmitScoresCall) -> Result<(), OracleError>;
}

/// Reads every feed currently registered.
pub async fn read_feed_list<O: Oracle + ?Sized>(oracle: &O) -> Result<FeedList, OracleError> {
    let len = oracle.feed_length().await?;
    let indices: Vec<u64> = (0..len).collect();
    oracle.feed_list(&indices).await
}
