//! Handler for address registration.

use axum::{Form, extract::State};
use validator::Validate;

use crate::api::dto::register::RegisterRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Issues a new disposable address for a website.
///
/// # Endpoint
///
/// `POST /register`
///
/// # Request Body
///
/// Form-encoded `site` and `url`.
///
/// # Response
///
/// The issued address as `text/plain`.
///
/// # Errors
///
/// - 400 if `site` or `url` is missing
/// - 500 if no unused address could be stored
pub async fn register_handler(
    State(state): State<AppState>,
    Form(payload): Form<RegisterRequest>,
) -> Result<String, AppError> {
    payload.validate()?;

    let user = state
        .registration_service
        .register(&payload.site, &payload.url)
        .await?;

    Ok(user.email)
}
