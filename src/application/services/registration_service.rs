//! Address issuing for website registrations.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{MailUser, NewMailUser};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::address_generator::AddressGenerator;
use crate::utils::domain_name::DomainLabeler;

/// Attempts made before giving up on generating an unused address.
const MAX_ATTEMPTS: usize = 3;

/// Issues one fresh disposable address per registration.
pub struct RegistrationService {
    users: Arc<dyn UserRepository>,
    generator: Arc<AddressGenerator>,
    labeler: Arc<DomainLabeler>,
    mail_domain: String,
}

impl RegistrationService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        generator: Arc<AddressGenerator>,
        labeler: Arc<DomainLabeler>,
        mail_domain: impl Into<String>,
    ) -> Self {
        Self {
            users,
            generator,
            labeler,
            mail_domain: mail_domain.into(),
        }
    }

    /// Creates a new address for `site`, registered at `url`.
    ///
    /// The registration domain is the registrable domain of `url`.
    /// A generated address that already exists is retried with a new one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `site` or `url` is blank.
    /// Returns [`AppError::Internal`] if every attempt collided or storage failed.
    pub async fn register(&self, site: &str, url: &str) -> Result<MailUser, AppError> {
        let site = site.trim();
        let url = url.trim();
        if site.is_empty() || url.is_empty() {
            return Err(AppError::bad_request(
                "Both site and url are required",
                json!({ "site": site, "url": url }),
            ));
        }

        tracing::info!(site, url, "Registration requested");
        let registration_domain = self.labeler.label(url);

        for attempt in 1..=MAX_ATTEMPTS {
            let email = self.generator.generate(&self.mail_domain);
            let new_user = NewMailUser {
                email: email.clone(),
                registration_site: site.to_string(),
                registration_url: url.to_string(),
                registration_domain: registration_domain.clone(),
            };

            match self.users.create(new_user).await {
                Ok(user) => {
                    tracing::info!(email = %user.email, id = user.id, "Created new user");
                    return Ok(user);
                }
                Err(AppError::Conflict { .. }) => {
                    tracing::debug!(email, attempt, "Generated address already taken");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate an unused address",
            json!({ "attempts": MAX_ATTEMPTS }),
        ))
    }
}
