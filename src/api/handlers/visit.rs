//! Handler for link-group handout.

use axum::{Json, extract::State};

use crate::api::dto::visit::VisitResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns a random pending link group for the browser agent.
///
/// # Endpoint
///
/// `GET /visit`
///
/// # Response
///
/// ```json
/// { "id": 12, "links": ["https://shop.com/deals?id=1"] }
/// ```
///
/// or `{}` when nothing is pending.
pub async fn visit_handler(State(state): State<AppState>) -> Result<Json<VisitResponse>, AppError> {
    let group = state.report_service.visit().await?;
    Ok(Json(VisitResponse::from(group)))
}
