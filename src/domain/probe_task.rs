//! Probe task model for asynchronous image fetching.

use std::sync::Arc;

use tokio::time::Instant;

use crate::domain::detection::{EncodingCatalog, ProbeReason};
use crate::domain::entities::MessageOrigin;

/// One image URL waiting to be fetched by the probe worker.
///
/// Created by the analyzer for every selected image and sent to the worker
/// channel. The catalog is shared between all tasks of one message. The
/// probe delay is counted from `queued_at`.
#[derive(Debug, Clone)]
pub struct ProbeTask {
    pub url: String,
    pub reason: ProbeReason,
    pub origin: MessageOrigin,
    pub catalog: Arc<EncodingCatalog>,
    pub queued_at: Instant,
}

impl ProbeTask {
    pub fn new(
        url: impl Into<String>,
        reason: ProbeReason,
        origin: MessageOrigin,
        catalog: Arc<EncodingCatalog>,
    ) -> Self {
        Self {
            url: url.into(),
            reason,
            origin,
            catalog,
            queued_at: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_share_catalog() {
        let catalog = Arc::new(EncodingCatalog::for_address("a@b.com"));
        let origin = MessageOrigin::new("shop.com", "news@shop.com", 1);

        let first = ProbeTask::new(
            "http://t.example/p.gif",
            ProbeReason::TrackingPixel,
            origin.clone(),
            catalog.clone(),
        );
        let second = ProbeTask::new("http://t.example/q.gif", ProbeReason::ControlSample, origin, catalog);

        assert!(Arc::ptr_eq(&first.catalog, &second.catalog));
        assert_eq!(first.url, "http://t.example/p.gif");
    }
}
