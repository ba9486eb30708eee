//! Link-group handout and browser report processing.

use std::sync::Arc;

use serde_json::json;

use crate::domain::detection::{EncodingCatalog, ReportedEvent, classify_reported_events};
use crate::domain::entities::LinkGroup;
use crate::domain::leak_recorder::LeakRecorder;
use crate::domain::repositories::{LinkGroupRepository, UserRepository};
use crate::error::AppError;

/// Service backing the browser agent: hands out link groups and classifies
/// the network traffic observed while visiting them.
pub struct ReportService {
    users: Arc<dyn UserRepository>,
    link_groups: Arc<dyn LinkGroupRepository>,
    recorder: Arc<LeakRecorder>,
}

impl ReportService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        link_groups: Arc<dyn LinkGroupRepository>,
        recorder: Arc<LeakRecorder>,
    ) -> Self {
        Self {
            users,
            link_groups,
            recorder,
        }
    }

    /// Returns a random pending link group, if any.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn visit(&self) -> Result<Option<LinkGroup>, AppError> {
        let group = self.link_groups.fetch_random().await?;
        if let Some(group) = &group {
            tracing::info!(id = group.id, links = group.urls.len(), "Link group handed out");
        }
        Ok(group)
    }

    /// Classifies the events reported for a visited group and consumes it.
    ///
    /// Events for the group's own URLs are ignored. Every resulting leak is
    /// stored, then the group is deleted. Returns the number of leaks stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the group or its recipient does not exist.
    /// Returns [`AppError::Internal`] if a leak cannot be stored; the group is kept.
    pub async fn submit_results(
        &self,
        group_id: i64,
        events: &[ReportedEvent],
    ) -> Result<usize, AppError> {
        let group = self
            .link_groups
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| AppError::bad_request("Unknown link group", json!({ "id": group_id })))?;

        let user = self
            .users
            .find_by_id(group.recipient_id)
            .await?
            .ok_or_else(|| {
                AppError::bad_request(
                    "Link group recipient does not exist",
                    json!({ "id": group_id, "recipient_id": group.recipient_id }),
                )
            })?;

        tracing::info!(id = group.id, events = events.len(), "Results received");

        let catalog = EncodingCatalog::for_address(&user.email);
        let leaks = classify_reported_events(&group, events, &catalog);
        let count = leaks.len();
        for leak in leaks {
            self.recorder.try_record(leak).await?;
        }

        if let Err(e) = self.link_groups.delete(group.id).await {
            tracing::error!(id = group.id, "Failed to remove link group: {}", e);
        }

        Ok(count)
    }
}
