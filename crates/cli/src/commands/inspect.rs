use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use credbridge_kernel::types::{IdentityCache, ScoreSnapshot};
use std::path::Path;

use super::read_file;

/// One line per identity in the history. Identities cached but absent
/// from the history are listed after them.
pub fn rows(history: &ScoreSnapshot, cache: &IdentityCache) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = history
        .iter()
        .map(|(identity, score)| match cache.get(identity) {
            Some(addr) => vec![identity.to_string(), score.to_string(), addr.to_string(), "resolved".into()],
            None => vec![identity.to_string(), score.to_string(), String::new(), "unresolved".into()],
        })
        .collect();

    for (identity, addr) in cache.iter() {
        if history.get(identity).is_none() {
            rows.push(vec![identity.to_string(), String::new(), addr.to_string(), "resolved".into()]);
        }
    }
    rows
}

pub fn run(cache_path: &Path, history_path: &Path) -> anyhow::Result<()> {
    let cache = IdentityCache::from_json(&read_file(cache_path)?)?;
    let history = ScoreSnapshot::from_json(&read_file(history_path)?)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Identity", "Score", "Address", "Status"]);
    for row in rows(&history, &cache) {
        table.add_row(row);
    }

    println!("\nPersisted State");
    println!("---------------");
    println!("{table}");
    println!("{} scored, {} cached\n", history.len(), cache.len());
    Ok(())
}
