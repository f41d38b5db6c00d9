// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
mod common;

use alloy_signer_local::PrivateKeySigner;
use base64::Engine as _;
use credbridge_kernel::error::ProofFetchError;
use credbridge_kernel::resolver::ProofSource;
use credbridge_kernel::types::Identity;
use credbridge_kernel::verify::verify;
use credbridge_node::network::GithubProofSource;
use common::{address_of, signed_proof};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROOF_PATH: &str = "/repos/alice/alice/contents/ethereum-proof.json";

fn source(server: &MockServer, token: Option<&str>) -> GithubProofSource {
    GithubProofSource::new(
        &server.uri(),
        "ethereum-proof.json",
        token.map(str::to_string),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_fetch_decodes_contents_envelope() {
    let server = MockServer::start().await;
    let signer = PrivateKeySigner::random();
    let doc = signed_proof(&signer, "alice");
    let raw = serde_json::to_vec(&doc).unwrap();
    // The contents API wraps base64 at 60 columns.
    let encoded = base64::engine::general_purpose::STANDARD.encode(raw);
    let wrapped: String = encoded
        .as_bytes()
        .chunks(60)
        .map(|c| format!("{}\n", std::str::from_utf8(c).unwrap()))
        .collect();

    Mock::given(method("GET"))
        .and(path(PROOF_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "ethereum-proof.json",
            "encoding": "base64",
            "content": wrapped,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let alice = Identity::from("alice");
    let fetched = source(&server, None).fetch(&alice).await.unwrap();
    assert_eq!(fetched, doc);
    assert_eq!(verify(&alice, &fetched).unwrap(), address_of(&signer));
}

#[tokio::test]
async fn test_missing_proof_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROOF_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = source(&server, None).fetch(&Identity::from("alice")).await.unwrap_err();
    assert_eq!(err, ProofFetchError::NotFound);
}

#[tokio::test]
async fn test_rate_limit_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROOF_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = source(&server, None).fetch(&Identity::from("alice")).await.unwrap_err();
    assert!(matches!(err, ProofFetchError::Network(_)));
}

#[tokio::test]
async fn test_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    let doc = signed_proof(&PrivateKeySigner::random(), "alice");
    let encoded = base64::engine::general_purpose::STANDARD.encode(serde_json::to_vec(&doc).unwrap());

    Mock::given(method("GET"))
        .and(path(PROOF_PATH))
        .and(header("authorization", "Bearer ghp_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": encoded })))
        .expect(1)
        .mount(&server)
        .await;

    let fetched = source(&server, Some("ghp_test")).fetch(&Identity::from("alice")).await;
    assert!(fetched.is_ok());
}

#[tokio::test]
async fn test_garbage_body_is_an_envelope_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROOF_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = source(&server, None).fetch(&Identity::from("alice")).await.unwrap_err();
    assert!(matches!(err, ProofFetchError::Envelope(_)));
}

#[tokio::test]
async fn test_slow_response_is_a_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROOF_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let source = GithubProofSource::new(&server.uri(), "ethereum-proof.json", None, Duration::from_secs(1)).unwrap();
    let err = source.fetch(&Identity::from("alice")).await.unwrap_err();
    assert_eq!(err, ProofFetchError::Timeout);
}

#[test]
fn test_identity_is_a_single_encoded_path_segment() {
    let source = GithubProofSource::new(
        "https://github.example/api/v3/",
        "ethereum-proof.json",
        None,
        Duration::from_secs(5),
    )
    .unwrap();

    let plain = source.proof_url(&Identity::from("alice"));
    assert_eq!(
        plain.as_str(),
        "https://github.example/api/v3/repos/alice/alice/contents/ethereum-proof.json"
    );

    let hostile = source.proof_url(&Identity::from("evil/x?y#z"));
    assert_eq!(
        hostile.path(),
        "/api/v3/repos/evil%2Fx%3Fy%23z/evil%2Fx%3Fy%23z/contents/ethereum-proof.json"
    );
    assert_eq!(hostile.query(), None);
    assert_eq!(hostile.fragment(), None);
}
