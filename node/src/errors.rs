// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use credbridge_kernel::error::{KernelError, OracleError, PlanError};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),
    #[error("Scoring pipeline failed: {0}")]
    Scoring(String),
    #[error("Failed to read {path:?}: {reason}")]
    StoreRead { path: PathBuf, reason: String },
    #[error("Failed to persist {path:?}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Pass worker unavailable")]
    WorkerUnavailable,
}

impl From<OracleError> for NodeError {
    fn from(e: OracleError) -> Self {
        NodeError::Kernel(KernelError::Oracle(e))
    }
}

impl From<PlanError> for NodeError {
    fn from(e: PlanError) -> Self {
        NodeError::Kernel(KernelError::Plan(e))
    }
}

impl IntoResponse for NodeError {
    fn into_response(self) -> Response {
        let status = match &self {
            NodeError::Kernel(KernelError::Oracle(_)) | NodeError::Network(_) => StatusCode::BAD_GATEWAY,
            NodeError::Scoring(_) => StatusCode::BAD_GATEWAY,
            NodeError::WorkerUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            NodeError::Kernel(_)
            | NodeError::StoreRead { .. }
            | NodeError::CacheWrite { .. }
            | NodeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
