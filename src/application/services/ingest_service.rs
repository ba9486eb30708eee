//! Entry point for messages handed over by the mail front-end.

use std::sync::Arc;

use crate::application::services::analyzer::{AnalysisReport, MailAnalyzer};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// Accepts or rejects recipients and routes accepted messages to the analyzer.
pub struct IngestService {
    users: Arc<dyn UserRepository>,
    analyzer: Arc<MailAnalyzer>,
}

impl IngestService {
    pub fn new(users: Arc<dyn UserRepository>, analyzer: Arc<MailAnalyzer>) -> Self {
        Self { users, analyzer }
    }

    /// Returns whether mail for `recipient` should be accepted.
    ///
    /// Unknown recipients are rejected. A storage error accepts the message
    /// rather than bouncing mail for a possibly valid address.
    pub async fn accept(&self, recipient: &str) -> bool {
        match self.users.email_exists(recipient).await {
            Ok(exists) => exists,
            Err(e) => {
                tracing::error!(recipient, "Failed to look up recipient: {}", e);
                true
            }
        }
    }

    /// Counts and analyzes one accepted message.
    ///
    /// The analyzer sees the recipient as it was before this message was
    /// counted. Returns `None` if the recipient does not exist.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the recipient lookup and analyzer errors.
    pub async fn handle_message(
        &self,
        sender: &str,
        recipient: &str,
        raw: &[u8],
    ) -> Result<Option<AnalysisReport>, AppError> {
        let Some(user) = self.users.find_by_email(recipient).await? else {
            tracing::error!(recipient, "No user entry for recipient");
            return Ok(None);
        };

        if let Err(e) = self.users.increment_received(user.id).await {
            tracing::error!(recipient_id = user.id, "Failed to count received message: {}", e);
        }

        let report = self.analyzer.analyze(sender, &user, raw).await?;
        Ok(Some(report))
    }
}
