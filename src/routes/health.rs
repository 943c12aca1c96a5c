//! Health check endpoint for container orchestration.
//!
//! Probes the student store with a trivial query and reports the outcome.
//! Unauthenticated and read-only, so liveness checks can call it freely.

use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health probe response body.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    #[serde(serialize_with = "db::serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health check handler.
///
/// Returns 200 when the store answers, 503 with the store's error otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthReport {
                status: HealthStatus::Healthy,
                timestamp: db::now(),
                database: Some("connected"),
                version: Some(state.config.version.clone()),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthReport {
                    status: HealthStatus::Unhealthy,
                    timestamp: db::now(),
                    database: None,
                    version: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
