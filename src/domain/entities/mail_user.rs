//! Mail user entity: one issued disposable address.

use chrono::{DateTime, Utc};

/// A disposable address issued to a website during registration.
///
/// Counters are maintained by the persistence layer and may be out of date
/// by the time a caller reads them.
#[derive(Debug, Clone)]
pub struct MailUser {
    pub id: i64,
    pub email: String,
    pub registration_site: String,
    pub registration_url: String,
    pub registration_domain: String,
    pub registered_at: DateTime<Utc>,
    pub received_email_count: i32,
    pub leak_count: i32,
    pub third_party_leak_count: i32,
}

impl MailUser {
    /// Creates a user with zeroed counters.
    pub fn new(
        id: i64,
        email: String,
        registration_site: String,
        registration_url: String,
        registration_domain: String,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            registration_site,
            registration_url,
            registration_domain,
            registered_at,
            received_email_count: 0,
            leak_count: 0,
            third_party_leak_count: 0,
        }
    }

    /// Returns true if no message has been received for this address yet.
    pub fn is_first_message(&self) -> bool {
        self.received_email_count == 0
    }
}

/// Input data for issuing a new address.
#[derive(Debug, Clone)]
pub struct NewMailUser {
    pub email: String,
    pub registration_site: String,
    pub registration_url: String,
    pub registration_domain: String,
}
