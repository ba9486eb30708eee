//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Store**: `SELECT 1` against PostgreSQL, or the in-memory store
/// 2. **Probe Queue**: Channel open and remaining capacity
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store = check_store(&state).await;
    let probe_queue = check_probe_queue(&state);

    let all_healthy = store.is_ok() && probe_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { store, probe_queue },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_store(state: &AppState) -> CheckStatus {
    let Some(pool) = &state.pool else {
        return CheckStatus::ok("In-memory store");
    };

    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool.as_ref())
        .await
    {
        Ok(_) => CheckStatus::ok("PostgreSQL connected"),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    }
}

fn check_probe_queue(state: &AppState) -> CheckStatus {
    if state.probe_scheduler.is_closed() {
        CheckStatus::error("Probe queue is closed")
    } else {
        CheckStatus::ok(format!(
            "Capacity: {}/{}",
            state.probe_scheduler.available(),
            state.probe_scheduler.max_capacity()
        ))
    }
}
