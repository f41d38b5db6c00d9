// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::Parser;
use credbridge_kernel::oracle::Oracle;
use credbridge_node::config::NodeConfig;
use credbridge_node::engine::PassEngine;
use credbridge_node::errors::NodeError;
use credbridge_node::network::{BoundedOracle, ChainOracle, DistributionReader, GithubProofSource, IdaReader};
use credbridge_node::persistence::StateStore;
use credbridge_node::scoring::CommandScorePipeline;
use credbridge_node::server::{build_router, AppState};
use credbridge_node::telemetry::init_telemetry;
use credbridge_node::worker::spawn_worker;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    // A missing .env is normal in production.
    let _ = dotenvy::dotenv();
    let cfg = NodeConfig::parse();
    init_telemetry();

    if let Err(e) = run(cfg).await {
        tracing::error!("Node stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(cfg: NodeConfig) -> Result<(), NodeError> {
    cfg.validate().map_err(NodeError::Config)?;
    tracing::info!(
        "Starting credbridge node: oracle {:?}, cache {:?}, history {:?}",
        cfg.oracle_address,
        cfg.cache_path,
        cfg.history_path
    );

    let chain: Arc<dyn Oracle> = Arc::new(ChainOracle::connect(&cfg)?);
    let oracle: Arc<dyn Oracle> = Arc::new(BoundedOracle::new(chain, cfg.oracle_timeout()));
    let proofs = Arc::new(GithubProofSource::new(
        &cfg.github_api_url,
        &cfg.proof_file,
        cfg.github_token.clone(),
        cfg.proof_timeout(),
    )?);
    let scores = Arc::new(CommandScorePipeline::from_config(&cfg));
    let store = StateStore::from_config(&cfg);
    let distribution = IdaReader::connect(&cfg)?.map(|r| Arc::new(r) as Arc<dyn DistributionReader>);

    let engine = PassEngine::new(scores, proofs, oracle, store.clone(), cfg.reconcile());
    let passes = spawn_worker(Arc::new(engine));

    let app = build_router(
        AppState {
            passes,
            store,
            distribution,
        },
        cfg.auth_token.clone(),
    );

    let listener = TcpListener::bind(cfg.bind_addr)
        .await
        .map_err(|e| NodeError::Config(format!("bind {}: {}", cfg.bind_addr, e)))?;
    tracing::info!("Listening on {}", cfg.bind_addr);
    axum::serve(listener, app)
        .await
        .map_err(|e| NodeError::Network(e.to_string()))
}
