//! Alex Web API
//!
//! 启动: cargo run --bin interviewer-web --features web
//! POST http://127.0.0.1:8080/api/ai  {"action": "start" | "evaluate", ...}

#![cfg(feature = "web")]

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use interviewer::agent::handle_body;
use interviewer::config::{load_config, AppConfig};
use interviewer::interview::InterviewController;
use interviewer::observability;

struct AppState {
    controller: InterviewController,
}

async fn api_ai(State(state): State<Arc<AppState>>, body: String) -> (StatusCode, Json<Value>) {
    let res = handle_body(&state.controller, &body).await;
    let status = StatusCode::from_u16(res.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(res.body))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });

    let state = Arc::new(AppState {
        controller: InterviewController::from_config(&cfg),
    });

    let app = Router::new()
        .route("/api/ai", post(api_ai))
        .route("/api/health", get(|| async { "OK" }))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.app.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", cfg.app.bind_addr))?;
    tracing::info!("{} listening on http://{}", cfg.app.name, cfg.app.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
