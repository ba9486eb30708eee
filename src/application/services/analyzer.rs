//! Per-message leak analysis.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use serde_json::json;

use crate::domain::detection::{
    ConfirmationInput, EncodingCatalog, extract, find_confirmation_link, scan, select_probes,
    select_revisit_urls,
};
use crate::domain::entities::{LeakRecord, MailUser, MessageOrigin, NewLinkGroup};
use crate::domain::leak_recorder::LeakRecorder;
use crate::domain::probe_task::ProbeTask;
use crate::domain::probe_worker::ProbeScheduler;
use crate::domain::repositories::LinkGroupRepository;
use crate::error::AppError;
use crate::infrastructure::mail::MessageContent;

/// What one call to [`MailAnalyzer::analyze`] produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    pub leaks_recorded: usize,
    pub probes_scheduled: usize,
    pub link_groups_created: usize,
}

/// Runs the detection pipeline over inbound messages.
///
/// For a message with an HTML body this scans every extracted link for
/// encodings of the recipient address, schedules image probes and records a
/// group of anchors to revisit. The recipient's first message is also
/// searched for a confirmation link, HTML or not.
///
/// Every write is best-effort: a failed write is logged and the remaining
/// steps still run.
pub struct MailAnalyzer {
    recorder: Arc<LeakRecorder>,
    link_groups: Arc<dyn LinkGroupRepository>,
    scheduler: ProbeScheduler,
    rng: Mutex<StdRng>,
}

impl MailAnalyzer {
    /// Creates an analyzer drawing all selection randomness from `rng`.
    pub fn new(
        recorder: Arc<LeakRecorder>,
        link_groups: Arc<dyn LinkGroupRepository>,
        scheduler: ProbeScheduler,
        rng: StdRng,
    ) -> Self {
        Self {
            recorder,
            link_groups,
            scheduler,
            rng: Mutex::new(rng),
        }
    }

    /// Analyzes one message received by `user` from `sender`.
    ///
    /// `user` must be the state read before this message was counted, so
    /// that the first message has a zero received count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the recipient has no address.
    /// Malformed messages are logged and yield an empty report.
    pub async fn analyze(
        &self,
        sender: &str,
        user: &MailUser,
        raw: &[u8],
    ) -> Result<AnalysisReport, AppError> {
        if user.email.is_empty() {
            return Err(AppError::bad_request(
                "Recipient has no address",
                json!({ "recipient_id": user.id }),
            ));
        }

        let mut report = AnalysisReport::default();
        if user.registration_domain.is_empty() {
            tracing::debug!(recipient_id = user.id, "Recipient has no registration domain, skipping");
            return Ok(report);
        }

        let message = match MessageContent::parse(raw) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(recipient_id = user.id, sender, "Failed to parse message: {}", e);
                return Ok(report);
            }
        };

        let origin = MessageOrigin::new(user.registration_domain.clone(), sender, user.id);
        let content = message.html.as_deref().map(extract);

        if user.is_first_message() {
            let input = ConfirmationInput {
                subject: &message.subject,
                html: content.as_ref(),
                text: message.text.as_deref(),
            };
            if let Some(url) = find_confirmation_link(input) {
                tracing::info!(recipient_id = user.id, url = %url, "Confirmation link found");
                if self.create_link_group(vec![url], &origin).await {
                    report.link_groups_created += 1;
                }
            }
        }

        let Some(content) = content else {
            return Ok(report);
        };

        let catalog = Arc::new(EncodingCatalog::for_address(&user.email));

        let leaks: Vec<LeakRecord> = content
            .links
            .iter()
            .flat_map(|link| {
                let origin = &origin;
                scan(&link.url, &catalog).into_iter().map(move |enc| {
                    LeakRecord::new(&link.url, link.kind.leak_source(), enc.name, false, true, origin)
                })
            })
            .collect();
        report.leaks_recorded = self.recorder.record_all(leaks).await;

        let (probes, revisit) = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            let probes = select_probes(&content, &catalog, &mut *rng);
            let anchors: Vec<&str> = content.anchors.iter().map(|a| a.url.as_str()).collect();
            let revisit = select_revisit_urls(&anchors, &catalog, &mut *rng);
            (probes, revisit)
        };

        for probe in probes {
            let task = ProbeTask::new(probe.url, probe.reason, origin.clone(), catalog.clone());
            if self.scheduler.schedule(task) {
                report.probes_scheduled += 1;
            }
        }

        if !revisit.is_empty() && self.create_link_group(revisit, &origin).await {
            report.link_groups_created += 1;
        }

        tracing::info!(
            recipient_id = user.id,
            sender,
            links = content.links.len(),
            leaks = report.leaks_recorded,
            probes = report.probes_scheduled,
            link_groups = report.link_groups_created,
            "Message analyzed"
        );

        Ok(report)
    }

    async fn create_link_group(&self, urls: Vec<String>, origin: &MessageOrigin) -> bool {
        let group = NewLinkGroup {
            urls,
            origin: origin.clone(),
        };
        match self.link_groups.create(group).await {
            Ok(group) => {
                tracing::debug!(id = group.id, urls = ?group.urls, "Link group created");
                metrics::counter!("leakmail_link_groups_created_total").increment(1);
                true
            }
            Err(e) => {
                tracing::error!(recipient_id = origin.recipient_id, "Failed to create link group: {}", e);
                false
            }
        }
    }
}
