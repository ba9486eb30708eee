//! Per-client rate limiting for the write endpoints.
//!
//! `/register` and `/results` are rate limited with a token bucket keyed on
//! the client IP. Behind a trusted reverse proxy the IP is read from
//! `X-Forwarded-For` / `X-Real-IP` / `Forwarded`; otherwise the socket peer
//! address is used, which requires serving with connect info.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::state::AppState;

/// Sustained requests per second per client.
const PER_SECOND: u64 = 2;
/// Requests a client may send in a burst.
const BURST_SIZE: u32 = 50;

fn governor_layer<K>(extractor: K) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>
where
    K: KeyExtractor,
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(PER_SECOND)
            .burst_size(BURST_SIZE)
            .key_extractor(extractor)
            .finish()
            .expect("rate limit settings are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Rate limiter keyed on the socket peer address.
pub fn layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    governor_layer(PeerIpKeyExtractor)
}

/// Rate limiter keyed on forwarded client IP headers, falling back to the peer address.
pub fn proxy_layer()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    governor_layer(SmartIpKeyExtractor)
}

/// Applies the limiter matching the deployment to `router`.
pub fn apply(router: Router<AppState>, behind_proxy: bool) -> Router<AppState> {
    if behind_proxy {
        router.layer(proxy_layer())
    } else {
        router.layer(layer())
    }
}
