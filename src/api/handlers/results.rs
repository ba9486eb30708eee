//! Handler for browser report submission.

use axum::{Json, body::Bytes, extract::State};
use serde_json::json;

use crate::api::dto::results::{ResultsRequest, ResultsResponse};
use crate::domain::detection::ReportedEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Classifies the traffic observed while visiting a link group.
///
/// # Endpoint
///
/// `POST /results`
///
/// # Request Body
///
/// ```json
/// { "id": 12, "requests": [["https://ads.net/t?e=...", "https://shop.com/", null, null]] }
/// ```
///
/// Bodies sent with `Content-Encoding: gzip` are decompressed by the router.
///
/// # Errors
///
/// - 400 if the body is empty or malformed, or the group does not exist
/// - 500 if a leak cannot be stored
pub async fn results_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ResultsResponse>, AppError> {
    if body.is_empty() {
        return Err(AppError::bad_request("Empty request body", json!({})));
    }

    let payload: ResultsRequest = serde_json::from_slice(&body).map_err(|e| {
        AppError::bad_request("Malformed results body", json!({ "reason": e.to_string() }))
    })?;

    let events: Vec<ReportedEvent> = payload.requests.into_iter().map(Into::into).collect();
    let leaks_recorded = state
        .report_service
        .submit_results(payload.id, &events)
        .await?;

    Ok(Json(ResultsResponse {
        id: payload.id,
        leaks_recorded,
    }))
}
