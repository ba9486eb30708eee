//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /register` - Issue an address (rate limited)
//! - `GET  /visit`    - Link group for the browser agent
//! - `POST /results`  - Browser report submission (rate limited)
//! - `GET  /health`   - Store and probe queue status
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   forwarded headers instead of the peer socket address; enable only when
///   the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(api::routes::pipeline_routes(behind_proxy))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
