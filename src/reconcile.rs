// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! The reconciliation engine.

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::config::{DeferPolicy, ReconcileConfig};
use crate::differ::should_act;
use crate::fxp::scale_score;
use crate::matcher::has_feed;
use crate::resolver::{DeferReason, IdentityResolver, ProofSource, Resolution};
use crate::types::feed::FeedList;
use crate::types::id::{Address, Identity};
use crate::types::snapshot::{IdentityCache, ScoreSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreUpdate {
    pub identity: Identity,
    pub address: Address,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deferred {
    pub identity: Identity,
    pub reason: DeferReason,
}

/// Everything one pass decided.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationPlan {
    pub updated_cache: IdentityCache,
    /// Addresses with no feed yet, in first-seen order, without duplicates.
    pub feeds_to_create: Vec<Address>,
    /// One entry per acting, resolved identity, in snapshot order.
    pub scores_to_post: Vec<ScoreUpdate>,
    /// Identities that acted but could not be resolved this pass.
    pub deferred: Vec<Deferred>,
}

impl ReconciliationPlan {
    pub fn is_empty(&self) -> bool {
        self.feeds_to_create.is_empty() && self.scores_to_post.is_empty()
    }

    /// The score history to persist once this plan has been submitted.
    ///
    /// Under [`DeferPolicy::Retry`] a deferred identity keeps its previous
    /// entry (or stays absent), so it acts again on the next pass. Under
    /// [`DeferPolicy::Drop`] history becomes `new` unchanged.
    pub fn next_history(&self, old: &ScoreSnapshot, new: &ScoreSnapshot, policy: DeferPolicy) -> ScoreSnapshot {
        let mut next = new.clone();
        if policy == DeferPolicy::Retry {
            for d in &self.deferred {
                match old.get(&d.identity) {
                    Some(previous) => next.insert(d.identity.clone(), previous),
                    None => {
                        next.remove(&d.identity);
                    }
                }
            }
        }
        next
    }
}

/// Decides, for every identity in `new`, whether to post its score and
/// whether its address still needs a feed.
///
/// Identities are processed one at a time in snapshot order. A score that
/// cannot be scaled for the oracle, or an identity that cannot be resolved,
/// never stops the pass; either is recorded in
/// [`ReconciliationPlan::deferred`]. The cache is taken by value and handed
/// back, grown by whatever was freshly verified.
pub async fn reconcile<S: ProofSource + ?Sized>(
    old: &ScoreSnapshot,
    new: &ScoreSnapshot,
    mut cache: IdentityCache,
    feed_list: &FeedList,
    source: &S,
    config: &ReconcileConfig,
) -> ReconciliationPlan {
    let resolver = IdentityResolver::new(source);

    let mut feeds_to_create = Vec::new();
    let mut queued: FxHashSet<Address> = FxHashSet::default();
    let mut scores_to_post = Vec::new();
    let mut deferred = Vec::new();

    for (identity, new_score) in new.iter() {
        let old_score = old.get(identity);
        tracing::debug!("{}: {:?} -> {}", identity, old_score, new_score);

        if !should_act(old_score, new_score, config.min_differential) {
            continue;
        }

        if let Err(e) = scale_score(new_score) {
            tracing::warn!("Score {} for {} cannot be posted: {}", new_score, identity, e);
            deferred.push(Deferred {
                identity: identity.clone(),
                reason: DeferReason::InvalidScore(e.to_string()),
            });
            continue;
        }

        let address = match resolver.resolve(identity, &mut cache).await {
            Resolution::Cached(a) | Resolution::Verified(a) => a,
            Resolution::Unresolved(reason) => {
                deferred.push(Deferred {
                    identity: identity.clone(),
                    reason,
                });
                continue;
            }
        };

        tracing::info!("Posting new score for {} ({}): {}", identity, address, new_score);
        scores_to_post.push(ScoreUpdate {
            identity: identity.clone(),
            address,
            score: new_score,
        });

        if !has_feed(&address, feed_list) && queued.insert(address) {
            tracing::info!("No feed for {}, queueing feed creation", address);
            feeds_to_create.push(address);
        }
    }

    ReconciliationPlan {
        updated_cache: cache,
        feeds_to_create,
        scores_to_post,
        deferred,
    }
}
