// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::{from_fn_with_state, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::{DashboardResponse, PassReport};
use crate::dashboard::build_dashboard;
use crate::errors::NodeError;
use crate::network::DistributionReader;
use crate::persistence::StateStore;
use crate::worker::PassHandle;

#[derive(Clone)]
pub struct AppState {
    pub passes: PassHandle,
    pub store: StateStore,
    pub distribution: Option<Arc<dyn DistributionReader>>,
}

async fn auth_guard(
    State(token): State<Arc<String>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|val| val.to_str().ok())
        .and_then(|val| val.strip_prefix("Bearer "));

    match provided {
        Some(p) if p == token.as_str() => Ok(next.run(req).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Webhook on `POST /`; read-only views elsewhere. The bearer token, when
/// configured, guards only the webhook.
pub fn build_router(state: AppState, auth_token: Option<String>) -> Router {
    let mut webhook = Router::new().route("/", post(trigger_pass));
    if let Some(token) = auth_token {
        tracing::info!("Auth Enabled: Bearer token required on the webhook");
        webhook = webhook.route_layer(from_fn_with_state(Arc::new(token), auth_guard));
    } else {
        tracing::warn!("Auth Disabled: anyone can trigger a pass");
    }

    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .merge(webhook)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn trigger_pass(State(state): State<AppState>) -> Result<Json<PassReport>, NodeError> {
    tracing::info!("Webhook received, queueing pass");
    let report = state.passes.trigger().await?;
    Ok(Json(report))
}

async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, NodeError> {
    let view = build_dashboard(&state.store, state.distribution.as_deref()).await?;
    Ok(Json(view))
}

async fn health() -> &'static str {
    "ok"
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}
