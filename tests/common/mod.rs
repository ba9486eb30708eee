#![allow(dead_code)]

use std::sync::Arc;

use leakmail::domain::entities::{LinkGroup, MailUser, MessageOrigin, NewLinkGroup, NewMailUser};
use leakmail::domain::probe_task::ProbeTask;
use leakmail::domain::probe_worker::ProbeScheduler;
use leakmail::domain::repositories::{LinkGroupRepository, UserRepository};
use leakmail::infrastructure::organizations::JsonOrganizationDirectory;
use leakmail::infrastructure::persistence::{MemoryStore, Repositories};
use leakmail::state::{AppState, Components};
use leakmail::utils::address_generator::AddressGenerator;
use leakmail::utils::domain_name::DomainLabeler;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;

pub const MAIL_DOMAIN: &str = "mail.test";

/// Components over a fresh in-memory store with a fixed rng seed.
pub fn create_test_components(store: Arc<MemoryStore>) -> Components {
    Components {
        repositories: Repositories::from_store(store),
        labeler: Arc::new(DomainLabeler::new()),
        organizations: Arc::new(
            JsonOrganizationDirectory::from_json(
                r#"[{"organization": "Ad Network", "domains": ["ads.example"]}]"#,
            )
            .unwrap(),
        ),
        generator: Arc::new(AddressGenerator::default()),
        mail_domain: MAIL_DOMAIN.to_string(),
        rng: StdRng::seed_from_u64(7),
    }
}

/// App state whose probe queue is left for the caller to drain.
pub fn create_test_state() -> (AppState, Arc<MemoryStore>, mpsc::Receiver<ProbeTask>) {
    let store = Arc::new(MemoryStore::new());
    let (scheduler, rx) = ProbeScheduler::channel(100);
    let state = AppState::new(create_test_components(store.clone()), scheduler);

    (state, store, rx)
}

pub async fn create_test_user(store: &MemoryStore, email: &str, site_url: &str) -> MailUser {
    UserRepository::create(
        store,
        NewMailUser {
            email: email.to_string(),
            registration_site: "Shop".to_string(),
            registration_url: site_url.to_string(),
            registration_domain: DomainLabeler::new().label(site_url),
        },
    )
    .await
    .unwrap()
}

pub async fn create_test_group(store: &MemoryStore, user: &MailUser, urls: &[&str]) -> LinkGroup {
    LinkGroupRepository::create(
        store,
        NewLinkGroup {
            urls: urls.iter().map(|u| u.to_string()).collect(),
            origin: MessageOrigin::new(&user.registration_domain, "news@shop.example", user.id),
        },
    )
    .await
    .unwrap()
}
