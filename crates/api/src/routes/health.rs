//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use persistence::db::{applied_schema_version, latest_schema_version};
use persistence::metrics::record_pool_metrics;
use serde::Serialize;
use std::time::Instant;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseHealth,
}

/// Database connectivity, pool occupancy and schema state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseHealth {
    pub connected: bool,
    pub latency_ms: Option<u64>,
    pub pool_size: u32,
    pub idle_connections: usize,
    pub schema_version: Option<i64>,
    pub expected_schema_version: i64,
}

impl DatabaseHealth {
    fn schema_current(&self) -> bool {
        self.schema_version
            .is_some_and(|applied| applied >= self.expected_schema_version)
    }
}

/// Simple status response for liveness and readiness checks.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

async fn check_database(state: &AppState) -> DatabaseHealth {
    let start = Instant::now();
    let schema = applied_schema_version(&state.pool).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let connected = schema.is_ok();
    DatabaseHealth {
        connected,
        latency_ms: connected.then_some(latency_ms),
        pool_size: state.pool.size(),
        idle_connections: state.pool.num_idle(),
        schema_version: schema.ok().flatten(),
        expected_schema_version: latest_schema_version(),
    }
}

/// Full health check endpoint. Also refreshes the pool gauges.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let database = check_database(&state).await;
    record_pool_metrics(&state.pool);

    if !database.connected {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let status = if database.schema_current() {
        "healthy"
    } else {
        "degraded"
    };
    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    }))
}

/// Liveness endpoint.
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness check: the database answers and every embedded migration is applied.
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    let database = check_database(&state).await;

    if database.connected && database.schema_current() {
        Ok(Json(StatusResponse {
            status: "ready".to_string(),
        }))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database(schema_version: Option<i64>) -> DatabaseHealth {
        DatabaseHealth {
            connected: true,
            latency_ms: Some(5),
            pool_size: 4,
            idle_connections: 3,
            schema_version,
            expected_schema_version: 5,
        }
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            database: database(Some(5)),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["database"]["latency_ms"], 5);
        assert_eq!(json["database"]["idle_connections"], 3);
        assert_eq!(json["database"]["schema_version"], 5);
    }

    #[test]
    fn test_schema_current() {
        assert!(database(Some(5)).schema_current());
        assert!(database(Some(6)).schema_current());
        assert!(!database(Some(4)).schema_current());
        assert!(!database(None).schema_current());
    }

    #[tokio::test]
    async fn test_live() {
        let Json(body) = live().await;
        assert_eq!(body.status, "alive");
    }
}
