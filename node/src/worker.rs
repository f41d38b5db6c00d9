// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::api::PassReport;
use crate::engine::PassEngine;
use crate::errors::NodeError;

type PassReply = oneshot::Sender<Result<PassReport, NodeError>>;

/// Queue depth for pending triggers. Triggers beyond it wait for a slot.
const TRIGGER_QUEUE: usize = 16;

/// Handle for requesting a pass. Cloned into every request handler.
#[derive(Clone)]
pub struct PassHandle {
    tx: mpsc::Sender<PassReply>,
}

impl PassHandle {
    /// Queues a pass and waits for its report.
    ///
    /// Passes run one at a time in arrival order; a trigger that lands
    /// while a pass is running gets its own full pass afterwards.
    pub async fn trigger(&self) -> Result<PassReport, NodeError> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(reply).await.map_err(|_| NodeError::WorkerUnavailable)?;
        rx.await.map_err(|_| NodeError::WorkerUnavailable)?
    }
}

/// Starts the single pass worker on the current runtime.
pub fn spawn_worker(engine: Arc<PassEngine>) -> PassHandle {
    let (tx, mut rx) = mpsc::channel::<PassReply>(TRIGGER_QUEUE);
    tokio::spawn(async move {
        while let Some(reply) = rx.recv().await {
            let result = engine.run_pass().await;
            if reply.send(result).is_err() {
                tracing::debug!("Pass finished after its caller went away");
            }
        }
        tracing::info!("Pass worker stopped");
    });
    PassHandle { tx }
}
