//! Link group entity: URLs queued for a browser-driven visit.

use super::origin::MessageOrigin;

/// A persisted batch of one or two URLs to be visited out of band.
///
/// Never mutated after creation; consumed once by the report flow and then
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkGroup {
    pub id: i64,
    pub sender_domain: String,
    pub sender_address: String,
    pub recipient_id: i64,
    pub urls: Vec<String>,
}

impl LinkGroup {
    pub fn new(
        id: i64,
        sender_domain: String,
        sender_address: String,
        recipient_id: i64,
        urls: Vec<String>,
    ) -> Self {
        Self {
            id,
            sender_domain,
            sender_address,
            recipient_id,
            urls,
        }
    }

    /// Returns true if `url` is one of the URLs the visit started from.
    pub fn is_base_url(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    pub fn origin(&self) -> MessageOrigin {
        MessageOrigin::new(
            self.sender_domain.clone(),
            self.sender_address.clone(),
            self.recipient_id,
        )
    }
}

/// Input data for creating a link group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLinkGroup {
    pub urls: Vec<String>,
    pub origin: MessageOrigin,
}
