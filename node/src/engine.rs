// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use credbridge_kernel::config::ReconcileConfig;
use credbridge_kernel::oracle::{read_feed_list, Oracle};
use credbridge_kernel::planner;
use credbridge_kernel::reconcile::reconcile;
use credbridge_kernel::resolver::ProofSource;
use std::sync::Arc;
use std::time::Instant;

use crate::api::{DeferredIdentity, PassReport};
use crate::errors::NodeError;
use crate::persistence::StateStore;
use crate::scoring::ScoreSource;
use crate::telemetry;

/// Runs one end-to-end reconciliation pass against its collaborators.
///
/// Nothing is persisted unless every oracle call of the pass succeeded;
/// a failed pass leaves the cache and history exactly as they were, so
/// the next pass recomputes the same work.
pub struct PassEngine {
    scores: Arc<dyn ScoreSource>,
    proofs: Arc<dyn ProofSource>,
    oracle: Arc<dyn Oracle>,
    store: StateStore,
    config: ReconcileConfig,
}

impl PassEngine {
    pub fn new(
        scores: Arc<dyn ScoreSource>,
        proofs: Arc<dyn ProofSource>,
        oracle: Arc<dyn Oracle>,
        store: StateStore,
        config: ReconcileConfig,
    ) -> Self {
        Self {
            scores,
            proofs,
            oracle,
            store,
            config,
        }
    }

    pub async fn run_pass(&self) -> Result<PassReport, NodeError> {
        let start = Instant::now();
        let result = self.run(start).await;
        metrics::histogram!(telemetry::PASS_DURATION_SECONDS, start.elapsed().as_secs_f64());

        match &result {
            Ok(report) => {
                metrics::increment_counter!(telemetry::PASSES_TOTAL);
                metrics::counter!(telemetry::SCORES_POSTED_TOTAL, report.scores_posted as u64);
                metrics::counter!(telemetry::FEEDS_CREATED_TOTAL, report.feeds_created as u64);
                metrics::counter!(telemetry::IDENTITIES_DEFERRED_TOTAL, report.deferred.len() as u64);
                metrics::counter!(telemetry::PROOFS_VERIFIED_TOTAL, report.newly_verified as u64);
            }
            Err(e) => {
                metrics::increment_counter!(telemetry::PASS_FAILURES_TOTAL);
                tracing::error!("Pass failed, state left untouched: {}", e);
            }
        }
        result
    }

    async fn run(&self, start: Instant) -> Result<PassReport, NodeError> {
        let feeds = read_feed_list(&*self.oracle).await?;
        tracing::debug!("Oracle lists {} feeds", feeds.len());

        let new_scores = self.scores.compute_scores().await?;
        let cache = self.store.load_cache().await?;
        let old_scores = self.store.load_history().await?;
        let cached_before = cache.len();

        let plan = reconcile(
            &old_scores,
            &new_scores,
            cache,
            &feeds,
            &*self.proofs,
            &self.config,
        )
        .await;
        tracing::info!(
            "Reconciled {} identities: {} feeds to create, {} scores to post, {} deferred",
            new_scores.len(),
            plan.feeds_to_create.len(),
            plan.scores_to_post.len(),
            plan.deferred.len()
        );

        let submission = planner::execute(&plan, &*self.oracle).await?;

        let history = plan.next_history(&old_scores, &new_scores, self.config.defer_policy);
        self.store.commit(&plan.updated_cache, &history)?;

        Ok(PassReport {
            identities_scored: new_scores.len(),
            scores_posted: submission.scores_submitted,
            feeds_created: submission.feeds_created,
            newly_verified: plan.updated_cache.len().saturating_sub(cached_before),
            deferred: plan.deferred.iter().map(DeferredIdentity::from).collect(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
