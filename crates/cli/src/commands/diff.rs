use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use credbridge_kernel::config::ReconcileConfig;
use credbridge_kernel::reconcile::{reconcile, ReconciliationPlan};
use credbridge_kernel::resolver::NoProofs;
use credbridge_kernel::types::{FeedList, IdentityCache, ScoreSnapshot};
use std::path::Path;

use super::read_file;

/// Reconciles without network access: identities missing from the cache
/// come back deferred instead of being fetched.
pub fn plan(
    old_path: &Path,
    new_path: &Path,
    cache_path: &Path,
    feeds_path: Option<&Path>,
    min_differential: f64,
) -> anyhow::Result<ReconciliationPlan> {
    let old = ScoreSnapshot::from_json(&read_file(old_path)?)?;
    let new = ScoreSnapshot::from_json(&read_file(new_path)?)?;
    let cache = IdentityCache::from_json(&read_file(cache_path)?)?;
    let feeds = match feeds_path {
        Some(p) => serde_json::from_slice::<Vec<String>>(&read_file(p)?)?
            .into_iter()
            .collect::<FeedList>(),
        None => FeedList::default(),
    };
    let config = ReconcileConfig {
        min_differential,
        ..ReconcileConfig::default()
    };

    let rt = tokio::runtime::Builder::new_current_thread().build()?;
    Ok(rt.block_on(reconcile(&old, &new, cache, &feeds, &NoProofs, &config)))
}

pub fn run(
    old_path: &Path,
    new_path: &Path,
    cache_path: &Path,
    feeds_path: Option<&Path>,
    min_differential: f64,
) -> anyhow::Result<()> {
    let plan = plan(old_path, new_path, cache_path, feeds_path, min_differential)?;

    let mut scores = Table::new();
    scores
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Identity", "Address", "Score"]);
    for update in &plan.scores_to_post {
        scores.add_row(vec![
            update.identity.to_string(),
            update.address.to_string(),
            update.score.to_string(),
        ]);
    }
    println!("\nScores To Post ({})", plan.scores_to_post.len());
    println!("{scores}");

    if !plan.feeds_to_create.is_empty() {
        println!("\nFeeds To Create ({})", plan.feeds_to_create.len());
        for address in &plan.feeds_to_create {
            println!("  {}", address);
        }
    }

    if !plan.deferred.is_empty() {
        let mut deferred = Table::new();
        deferred
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Identity", "Reason"]);
        for d in &plan.deferred {
            deferred.add_row(vec![d.identity.to_string(), d.reason.to_string()]);
        }
        println!("\nDeferred ({})", plan.deferred.len());
        println!("{deferred}");
    }

    if plan.is_empty() {
        println!("\nNothing to submit.");
    }
    println!();
    Ok(())
}
