// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
mod common;

use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use credbridge_kernel::types::{Address, IdentityCache, ScoreSnapshot};
use credbridge_node::api::{DashboardResponse, PassReport};
use credbridge_node::errors::NodeError;
use credbridge_node::network::DistributionReader;
use credbridge_node::server::{build_router, AppState};
use credbridge_node::worker::spawn_worker;
use common::{address_of, signed_proof, Harness, MapProofs, MemoryOracle};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

struct FlatDistribution(f64);

#[async_trait]
impl DistributionReader for FlatDistribution {
    async fn pending(&self, _subscriber: &Address) -> Result<f64, NodeError> {
        Ok(self.0)
    }
}

fn app(h: Harness, token: Option<&str>, distribution: Option<f64>) -> (Router, Arc<MemoryOracle>, tempfile::TempDir) {
    let store = h.store.clone();
    let oracle = h.oracle.clone();
    let passes = spawn_worker(Arc::new(h.engine));
    let state = AppState {
        passes,
        store,
        distribution: distribution.map(|d| Arc::new(FlatDistribution(d)) as Arc<dyn DistributionReader>),
    };
    (build_router(state, token.map(str::to_string)), oracle, h.dir)
}

fn webhook(auth: Option<&str>) -> Request<Body> {
    let mut req = Request::builder().method("POST").uri("/");
    if let Some(value) = auth {
        req = req.header("authorization", value);
    }
    req.body(Body::empty()).unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(resp.into_body(), 1 << 20).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_webhook_runs_a_pass() {
    let alice = PrivateKeySigner::random();
    let mut proofs = MapProofs::default();
    proofs.0.insert("alice".into(), signed_proof(&alice, "alice"));
    let h = Harness::new(MemoryOracle::default(), proofs);
    h.scores.set([("alice", 3.0)].into_iter().collect());

    let (app, oracle, _dir) = app(h, None, None);
    let resp = app.oneshot(webhook(None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let report: PassReport = body_json(resp).await;
    assert_eq!(report.scores_posted, 1);
    assert_eq!(report.feeds_created, 1);
    assert_eq!(oracle.submissions().len(), 1);
}

#[tokio::test]
async fn test_webhook_requires_token_when_configured() {
    let h = Harness::new(MemoryOracle::default(), MapProofs::default());
    let (app, oracle, _dir) = app(h, Some("s3cret"), None);

    let resp = app.clone().oneshot(webhook(None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app.clone().oneshot(webhook(Some("Bearer wrong"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(oracle.submissions().is_empty());

    let resp = app.oneshot(webhook(Some("Bearer s3cret"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_token_does_not_guard_read_routes() {
    let h = Harness::new(MemoryOracle::default(), MapProofs::default());
    let (app, _oracle, _dir) = app(h, Some("s3cret"), None);

    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let req = Request::builder().uri("/dashboard").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let view: DashboardResponse = body_json(resp).await;
    assert!(view.is_empty());
}

#[tokio::test]
async fn test_failed_pass_maps_to_bad_gateway() {
    let alice = PrivateKeySigner::random();
    let mut proofs = MapProofs::default();
    proofs.0.insert("alice".into(), signed_proof(&alice, "alice"));
    let h = Harness::new(MemoryOracle::default(), proofs);
    h.scores.set([("alice", 3.0)].into_iter().collect());
    h.oracle.fail_submit.store(true, std::sync::atomic::Ordering::SeqCst);

    let (app, _oracle, _dir) = app(h, None, None);
    let resp = app.oneshot(webhook(None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("execution reverted"));
}

#[tokio::test]
async fn test_dashboard_joins_history_cache_and_pending() {
    let alice = PrivateKeySigner::random();
    let alice_addr = address_of(&alice);
    let h = Harness::new(MemoryOracle::default(), MapProofs::default());

    let cache: IdentityCache = [("alice", alice_addr)].into_iter().collect();
    let history: ScoreSnapshot = [("alice", 4.5), ("bob", 1.0)].into_iter().collect();
    h.store.commit(&cache, &history).unwrap();

    let (app, _oracle, _dir) = app(h, None, Some(0.75));
    let req = Request::builder().uri("/dashboard").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let view: DashboardResponse = body_json(resp).await;
    let alice_row = &view["alice"];
    assert_eq!(alice_row.score, 4.5);
    assert_eq!(alice_row.address, Some(alice_addr));
    assert_eq!(alice_row.pending, Some(0.75));

    let bob_row = &view["bob"];
    assert_eq!(bob_row.score, 1.0);
    assert_eq!(bob_row.address, None);
    assert_eq!(bob_row.pending, None);
}
