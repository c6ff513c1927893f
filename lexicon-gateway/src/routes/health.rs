//! Health check endpoint
//!
//! Liveness only: the gateway is healthy while it is serving. The backend
//! identifier is reported so operators can tell a mock deployment apart.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: &'static str,
    pub timestamp: String,
    /// Text-generation backend id
    pub backend: String,
    pub sessions: SessionHealth,
    /// Entries in the seed every session starts from
    pub seed_entries: usize,
}

#[derive(Serialize)]
pub struct SessionHealth {
    pub active: usize,
    pub max: usize,
}

/// Liveness probe - always returns 200 if the gateway is running
pub fn health_check(state: &AppState) -> Response<Full<Bytes>> {
    let response = HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        backend: state.backend_id.clone(),
        sessions: SessionHealth {
            active: state.sessions.len(),
            max: state.sessions.max_sessions(),
        },
        seed_entries: state.seed.entries.len(),
    };

    let body = serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"healthy":true}"#.to_string());

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}
