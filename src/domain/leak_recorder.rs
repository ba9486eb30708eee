//! Labels and persists leak records on behalf of the pipeline.

use std::sync::Arc;

use crate::domain::entities::LeakRecord;
use crate::domain::repositories::{LeakRepository, OrganizationDirectory};
use crate::error::AppError;
use crate::utils::domain_name::DomainLabeler;

/// Attaches domain and organization labels to leaks and stores them.
///
/// Storage failures are logged and swallowed so that one failed write never
/// aborts the rest of the analysis of a message.
pub struct LeakRecorder {
    leaks: Arc<dyn LeakRepository>,
    labeler: Arc<DomainLabeler>,
    organizations: Arc<dyn OrganizationDirectory>,
}

impl LeakRecorder {
    pub fn new(
        leaks: Arc<dyn LeakRepository>,
        labeler: Arc<DomainLabeler>,
        organizations: Arc<dyn OrganizationDirectory>,
    ) -> Self {
        Self {
            leaks,
            labeler,
            organizations,
        }
    }

    /// Returns the registrable domain of `url` and the organization owning it.
    pub fn label(&self, url: &str) -> (String, Option<String>) {
        let domain = self.labeler.label(url);
        let organization = if domain.is_empty() {
            None
        } else {
            self.organizations.lookup(&domain)
        };
        (domain, organization)
    }

    /// Labels and stores one leak, propagating storage errors.
    ///
    /// # Errors
    ///
    /// Returns the repository error if the write fails.
    pub async fn try_record(&self, leak: LeakRecord) -> Result<(), AppError> {
        let (url_domain, organization) = self.label(&leak.url);
        let leak = leak.with_labels(url_domain, organization);
        let source = leak.source.as_str();

        self.leaks.record_leak(leak.clone()).await?;

        tracing::debug!(
            url = %leak.url,
            encoding = %leak.encoding_name,
            source,
            "Leak recorded"
        );
        metrics::counter!("leakmail_leaks_recorded_total", "source" => source).increment(1);
        Ok(())
    }

    /// Labels and stores one leak. Returns false if the write failed.
    pub async fn record(&self, leak: LeakRecord) -> bool {
        let url = leak.url.clone();
        let recipient_id = leak.recipient_id;

        match self.try_record(leak).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(url = %url, recipient_id, "Failed to record leak: {}", e);
                false
            }
        }
    }

    /// Stores every leak, returning how many writes succeeded.
    pub async fn record_all(&self, leaks: impl IntoIterator<Item = LeakRecord>) -> usize {
        let mut stored = 0;
        for leak in leaks {
            if self.record(leak).await {
                stored += 1;
            }
        }
        stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{LeakSource, MessageOrigin};
    use crate::domain::repositories::{MockLeakRepository, MockOrganizationDirectory};
    use serde_json::json;

    fn leak(url: &str) -> LeakRecord {
        let origin = MessageOrigin::new("shop.com", "news@shop.com", 7);
        LeakRecord::new(url, LeakSource::Image, "md5", false, true, &origin)
    }

    #[tokio::test]
    async fn test_record_attaches_labels() {
        let mut leaks = MockLeakRepository::new();
        leaks
            .expect_record_leak()
            .withf(|l| l.url_domain == "tracker.net" && l.organization.as_deref() == Some("Tracker Inc"))
            .times(1)
            .returning(|_| Ok(()));

        let mut orgs = MockOrganizationDirectory::new();
        orgs.expect_lookup()
            .returning(|d| (d == "tracker.net").then(|| "Tracker Inc".to_string()));

        let recorder = LeakRecorder::new(
            Arc::new(leaks),
            Arc::new(DomainLabeler::new()),
            Arc::new(orgs),
        );

        assert!(recorder.record(leak("https://px.tracker.net/o.gif")).await);
    }

    #[tokio::test]
    async fn test_record_all_counts_successful_writes() {
        let mut leaks = MockLeakRepository::new();
        leaks.expect_record_leak().returning(|l| {
            if l.url.contains("fail") {
                Err(AppError::internal("Database error", json!({})))
            } else {
                Ok(())
            }
        });

        let mut orgs = MockOrganizationDirectory::new();
        orgs.expect_lookup().returning(|_| None);

        let recorder = LeakRecorder::new(
            Arc::new(leaks),
            Arc::new(DomainLabeler::new()),
            Arc::new(orgs),
        );

        let stored = recorder
            .record_all(vec![
                leak("https://a.com/1"),
                leak("https://a.com/fail"),
                leak("https://a.com/2"),
            ])
            .await;
        assert_eq!(stored, 2);
    }
}
