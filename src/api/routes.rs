//! API route configuration.

use crate::api::handlers::{register_handler, results_handler, visit_handler};
use crate::api::middleware::rate_limit;
use crate::state::AppState;
use axum::{
    Router,
    body::Body,
    routing::{MethodRouter, get, post},
};
use tower::ServiceBuilder;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::map_request_body::MapRequestBodyLayer;

/// Routes used by the registration tool and the browser agent.
///
/// # Endpoints
///
/// - `POST /register` - Issue a disposable address (rate limited)
/// - `GET  /visit`    - Fetch a random pending link group
/// - `POST /results`  - Submit observed traffic, gzip accepted (rate limited)
pub fn pipeline_routes(behind_proxy: bool) -> Router<AppState> {
    let limited = Router::new()
        .route("/register", post(register_handler))
        .route("/results", results_route());

    Router::new()
        .route("/visit", get(visit_handler))
        .merge(rate_limit::apply(limited, behind_proxy))
}

/// `POST /results` with request decompression in front of the handler.
///
/// The decompressed body is boxed back into an axum [`Body`] before it
/// reaches the route.
pub fn results_route() -> MethodRouter<AppState> {
    post(results_handler).layer(
        ServiceBuilder::new()
            .layer(RequestDecompressionLayer::new())
            .layer(MapRequestBodyLayer::new(Body::new)),
    )
}
