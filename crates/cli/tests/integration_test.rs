use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use credbridge_cli::commands::{diff, inspect, verify};
use credbridge_kernel::types::{Address, IdentityCache, ScoreSnapshot};
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, value: serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();
    path
}

fn proof_json(signer: &PrivateKeySigner, username: &str) -> serde_json::Value {
    let payload = json!({
        "ethereumAddress": Address(signer.address()).to_string(),
        "githubUsername": username,
    })
    .to_string();
    let sig = signer.sign_message_sync(payload.as_bytes()).unwrap();
    json!({ "payload": payload, "signature": format!("0x{}", hex::encode(sig.as_bytes())) })
}

#[test]
fn test_verify_proof_offline() {
    let dir = tempdir().unwrap();
    let signer = PrivateKeySigner::random();
    let file = write(dir.path(), "proof.json", proof_json(&signer, "alice"));

    let address = verify::check("alice", &file).unwrap();
    assert_eq!(address, Address(signer.address()));
    assert!(verify::run("alice", &file).is_ok());

    // Same document claimed by someone else.
    assert!(verify::check("mallory", &file).is_err());
}

#[test]
fn test_inspect_lists_resolved_and_unresolved() {
    let dir = tempdir().unwrap();
    let signer = PrivateKeySigner::random();
    let addr = Address(signer.address());

    let cache: IdentityCache = [("alice", addr), ("dormant", addr)].into_iter().collect();
    let history: ScoreSnapshot = [("alice", 2.0), ("bob", 1.5)].into_iter().collect();

    let rows = inspect::rows(&history, &cache);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], vec!["alice".to_string(), "2".into(), addr.to_string(), "resolved".into()]);
    assert_eq!(rows[1][0], "bob");
    assert_eq!(rows[1][3], "unresolved");
    assert_eq!(rows[2][0], "dormant");

    let cache_path = dir.path().join("cache.json");
    let history_path = dir.path().join("history.json");
    std::fs::write(&cache_path, cache.to_json()).unwrap();
    std::fs::write(&history_path, history.to_json()).unwrap();
    assert!(inspect::run(&cache_path, &history_path).is_ok());
}

#[test]
fn test_inspect_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let result = inspect::run(&dir.path().join("nope.json"), &dir.path().join("nope2.json"));
    assert!(result.is_err());
}

#[test]
fn test_diff_uses_cache_only() {
    let dir = tempdir().unwrap();
    let alice = Address(PrivateKeySigner::random().address());
    let bob = Address(PrivateKeySigner::random().address());

    let old = write(dir.path(), "old.json", json!({ "alice": 1.0, "bob": 5.0 }));
    let new = write(dir.path(), "new.json", json!({ "alice": 1.0, "bob": 6.0, "carol": 3.0 }));
    let cache = write(
        dir.path(),
        "cache.json",
        json!({ "alice": alice.to_string(), "bob": bob.to_string() }),
    );
    let feeds = write(dir.path(), "feeds.json", json!([bob.to_string()]));

    let plan = diff::plan(&old, &new, &cache, Some(&feeds), 0.0).unwrap();
    assert_eq!(plan.scores_to_post.len(), 1);
    assert_eq!(plan.scores_to_post[0].address, bob);
    assert_eq!(plan.scores_to_post[0].score, 6.0);
    assert!(plan.feeds_to_create.is_empty());
    assert_eq!(plan.deferred.len(), 1);
    assert_eq!(plan.deferred[0].identity.as_str(), "carol");

    // Default threshold acts on everyone; alice has no feed in this list.
    let plan = diff::plan(&old, &new, &cache, None, -1.0).unwrap();
    assert_eq!(plan.scores_to_post.len(), 2);
    assert_eq!(plan.feeds_to_create.len(), 2);
    assert!(diff::run(&old, &new, &cache, None, -1.0).is_ok());
}
