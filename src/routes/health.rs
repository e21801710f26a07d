use crate::error::AppResult;
use crate::routes::helpers::{write_json, Envelope};
use crate::routes::types::{HealthCheckResponse, HealthStatus, SystemInfo};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use std::sync::Arc;

use super::AppState;

/// Application version reported by the health check
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let database = match &state.database {
        Some(db) => {
            let start = std::time::Instant::now();
            match db.ping().await {
                Ok(()) => HealthStatus {
                    status: "healthy".to_string(),
                    latency_ms: Some(start.elapsed().as_millis() as u64),
                },
                Err(e) => {
                    tracing::warn!("Health check database ping failed: {}", e);
                    HealthStatus {
                        status: "unhealthy".to_string(),
                        latency_ms: None,
                    }
                }
            }
        }
        None => HealthStatus {
            status: "disabled".to_string(),
            latency_ms: None,
        },
    };

    let response = HealthCheckResponse {
        status: "available".to_string(),
        system_info: SystemInfo {
            environment: state.config.server.env.to_string(),
            version: VERSION.to_string(),
        },
        database,
    };

    write_json(
        StatusCode::OK,
        &Envelope::new("healthcheck", response),
        HeaderMap::new(),
    )
}
