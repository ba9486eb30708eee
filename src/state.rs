//! Shared application state and service wiring.

use std::sync::Arc;

use rand::rngs::StdRng;
use sqlx::PgPool;

use crate::application::services::{
    IngestService, MailAnalyzer, RegistrationService, ReportService,
};
use crate::domain::leak_recorder::LeakRecorder;
use crate::domain::probe_worker::ProbeScheduler;
use crate::domain::repositories::OrganizationDirectory;
use crate::infrastructure::persistence::Repositories;
use crate::utils::address_generator::AddressGenerator;
use crate::utils::domain_name::DomainLabeler;

/// Everything needed to build the services, before the probe queue exists.
pub struct Components {
    pub repositories: Repositories,
    pub labeler: Arc<DomainLabeler>,
    pub organizations: Arc<dyn OrganizationDirectory>,
    pub generator: Arc<AddressGenerator>,
    pub mail_domain: String,
    pub rng: StdRng,
}

impl Components {
    /// A leak recorder over the configured repositories and labels.
    pub fn recorder(&self) -> Arc<LeakRecorder> {
        Arc::new(LeakRecorder::new(
            self.repositories.leaks.clone(),
            self.labeler.clone(),
            self.organizations.clone(),
        ))
    }
}

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request (cheap due to `Arc` wrappers).
#[derive(Clone)]
pub struct AppState {
    pub registration_service: Arc<RegistrationService>,
    pub report_service: Arc<ReportService>,
    pub ingest_service: Arc<IngestService>,
    pub probe_scheduler: ProbeScheduler,
    /// Database pool, `None` when running on the in-memory store.
    pub pool: Option<Arc<PgPool>>,
}

impl AppState {
    /// Builds all services. Probes selected by the analyzer go to `probe_scheduler`.
    pub fn new(components: Components, probe_scheduler: ProbeScheduler) -> Self {
        let recorder = components.recorder();
        let Components {
            repositories,
            labeler,
            generator,
            mail_domain,
            rng,
            ..
        } = components;

        let analyzer = Arc::new(MailAnalyzer::new(
            recorder.clone(),
            repositories.link_groups.clone(),
            probe_scheduler.clone(),
            rng,
        ));

        Self {
            registration_service: Arc::new(RegistrationService::new(
                repositories.users.clone(),
                generator,
                labeler,
                mail_domain,
            )),
            report_service: Arc::new(ReportService::new(
                repositories.users.clone(),
                repositories.link_groups.clone(),
                recorder,
            )),
            ingest_service: Arc::new(IngestService::new(repositories.users.clone(), analyzer)),
            probe_scheduler,
            pool: repositories.pool,
        }
    }
}
