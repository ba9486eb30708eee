//! The set of repositories the service runs on.

use std::sync::Arc;

use sqlx::PgPool;

use super::{
    MemoryStore, PgLeakRepository, PgLinkGroupRepository, PgRedirectRepository, PgUserRepository,
};
use crate::domain::repositories::{
    LeakRepository, LinkGroupRepository, RedirectRepository, UserRepository,
};

/// Every repository the pipeline needs, behind trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub leaks: Arc<dyn LeakRepository>,
    pub redirects: Arc<dyn RedirectRepository>,
    pub link_groups: Arc<dyn LinkGroupRepository>,
    /// Present only for the PostgreSQL backend.
    pub pool: Option<Arc<PgPool>>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool.
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            leaks: Arc::new(PgLeakRepository::new(pool.clone())),
            redirects: Arc::new(PgRedirectRepository::new(pool.clone())),
            link_groups: Arc::new(PgLinkGroupRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// All repositories served by one [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    pub fn from_store(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            leaks: store.clone(),
            redirects: store.clone(),
            link_groups: store,
            pool: None,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }
}
