// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Turns a reconciliation plan into batched oracle calls.

use alloy_primitives::U256;
use serde::Serialize;

use crate::config::{FEED_COST, FEED_DECIMALS, FEED_LABEL, FEED_REVENUE_MODE, FEED_TIMESLOT};
use crate::error::{KernelResult, PlanError};
use crate::fxp::scale_score;
use crate::matcher::feed_index;
use crate::oracle::{read_feed_list, Oracle};
use crate::reconcile::ReconciliationPlan;
use crate::types::feed::FeedList;

/// Column-wise arguments of `createNewFeeds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateFeedsCall {
    pub names: Vec<String>,
    pub labels: Vec<String>,
    pub decimals: Vec<U256>,
    pub revenue_modes: Vec<U256>,
    pub timeslots: Vec<U256>,
    pub costs: Vec<U256>,
}

impl CreateFeedsCall {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Column-wise arguments of `submitFeed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitScoresCall {
    pub feed_ids: Vec<U256>,
    pub values: Vec<U256>,
}

impl SubmitScoresCall {
    pub fn len(&self) -> usize {
        self.feed_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feed_ids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OraclePlan {
    pub create: Option<CreateFeedsCall>,
    pub submit: SubmitScoresCall,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionReport {
    pub feeds_created: usize,
    pub scores_submitted: usize,
}

/// One batched creation for every queued address, with the fixed
/// deployment-wide feed metadata. `None` when nothing needs a feed.
pub fn create_call(plan: &ReconciliationPlan) -> Option<CreateFeedsCall> {
    let n = plan.feeds_to_create.len();
    if n == 0 {
        return None;
    }
    Some(CreateFeedsCall {
        names: plan.feeds_to_create.iter().map(|a| a.canonical()).collect(),
        labels: vec![FEED_LABEL.to_string(); n],
        decimals: vec![U256::from(FEED_DECIMALS); n],
        revenue_modes: vec![U256::from(FEED_REVENUE_MODE); n],
        timeslots: vec![U256::from(FEED_TIMESLOT); n],
        costs: vec![U256::from(FEED_COST); n],
    })
}

/// Scales every score in plan order. Runs before any oracle write, so an
/// unpostable score never leaves feeds created behind a failed pass.
pub fn scaled_values(plan: &ReconciliationPlan) -> Result<Vec<U256>, PlanError> {
    plan.scores_to_post
        .iter()
        .map(|update| {
            scale_score(update.score).map_err(|reason| PlanError::Score {
                address: update.address,
                score: update.score,
                reason,
            })
        })
        .collect()
}

fn feed_ids(plan: &ReconciliationPlan, fresh: &FeedList) -> Result<Vec<U256>, PlanError> {
    plan.scores_to_post
        .iter()
        .map(|update| {
            feed_index(&update.address, fresh)
                .map(|i| U256::from(i))
                .ok_or(PlanError::FeedIndexNotFound(update.address))
        })
        .collect()
}

/// Resolves every score's address against `fresh` and scales the score.
///
/// `fresh` must have been read after any feed creation completed. An
/// address missing from it is [`PlanError::FeedIndexNotFound`]; nothing is
/// ever submitted to a guessed index.
pub fn submit_call(plan: &ReconciliationPlan, fresh: &FeedList) -> Result<SubmitScoresCall, PlanError> {
    let values = scaled_values(plan)?;
    Ok(SubmitScoresCall {
        feed_ids: feed_ids(plan, fresh)?,
        values,
    })
}

/// Both calls at once, for a caller that already holds a post-creation
/// feed list.
pub fn plan(reconciliation: &ReconciliationPlan, fresh: &FeedList) -> Result<OraclePlan, PlanError> {
    Ok(OraclePlan {
        create: create_call(reconciliation),
        submit: submit_call(reconciliation, fresh)?,
    })
}

/// Runs the two-phase write: create feeds, re-read the registry, then
/// submit scores against the indices that read returned.
pub async fn execute<O: Oracle + ?Sized>(plan: &ReconciliationPlan, oracle: &O) -> KernelResult<SubmissionReport> {
    let mut report = SubmissionReport::default();
    let values = scaled_values(plan)?;

    match create_call(plan) {
        Some(call) => {
            tracing::info!("Creating {} new feeds...", call.len());
            oracle.create_new_feeds(&call).await?;
            report.feeds_created = call.len();
        }
        None => tracing::info!("Skipping feed creation."),
    }

    if plan.scores_to_post.is_empty() {
        tracing::info!("No scores to post.");
        return Ok(report);
    }

    let fresh = read_feed_list(oracle).await?;
    let call = SubmitScoresCall {
        feed_ids: feed_ids(plan, &fresh)?,
        values,
    };
    tracing::info!("Posting {} new scores...", call.len());
    oracle.submit_feed(&call).await?;
    report.scores_submitted = call.len();

    Ok(report)
}
