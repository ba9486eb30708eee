//! Provenance shared by everything derived from one inbound message.

/// Who sent a message and which issued address received it.
///
/// Copied into every leak record, redirect chain and link group produced
/// while analyzing that message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageOrigin {
    /// Registration domain of the recipient (the site the address was issued to).
    pub sender_domain: String,
    /// Envelope sender of the message.
    pub sender_address: String,
    pub recipient_id: i64,
}

impl MessageOrigin {
    pub fn new(
        sender_domain: impl Into<String>,
        sender_address: impl Into<String>,
        recipient_id: i64,
    ) -> Self {
        Self {
            sender_domain: sender_domain.into(),
            sender_address: sender_address.into(),
            recipient_id,
        }
    }
}
