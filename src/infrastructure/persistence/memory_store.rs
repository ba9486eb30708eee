//! In-process store used when no database is configured.

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use serde_json::json;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{LeakRecord, LinkGroup, MailUser, NewLinkGroup, NewMailUser};
use crate::domain::repositories::{
    LeakRepository, LinkGroupRepository, RedirectHop, RedirectRepository, UserRepository,
};
use crate::error::AppError;
use crate::utils::truncate::{truncate_domain, truncate_url};

#[derive(Default)]
struct State {
    users: Vec<MailUser>,
    leaks: Vec<LeakRecord>,
    hops: Vec<RedirectHop>,
    link_groups: Vec<LinkGroup>,
    next_user_id: i64,
    next_group_id: i64,
}

/// Implements every repository trait over a single mutex-guarded state.
///
/// Contents are lost on restart. Semantics match the PostgreSQL
/// repositories, including unique addresses and atomic counter updates.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, AppError> {
        self.state
            .lock()
            .map_err(|_| AppError::internal("Store lock poisoned", json!({})))
    }

    /// Number of stored link groups.
    pub fn link_group_count(&self) -> usize {
        self.state.lock().map(|s| s.link_groups.len()).unwrap_or(0)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewMailUser) -> Result<MailUser, AppError> {
        let mut state = self.lock()?;
        if state.users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "users_email_key" }),
            ));
        }

        state.next_user_id += 1;
        let user = MailUser::new(
            state.next_user_id,
            new_user.email,
            new_user.registration_site,
            truncate_url(&new_user.registration_url),
            truncate_domain(&new_user.registration_domain),
            Utc::now(),
        );
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<MailUser>, AppError> {
        Ok(self.lock()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<MailUser>, AppError> {
        Ok(self.lock()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.lock()?.users.iter().any(|u| u.email == email))
    }

    async fn increment_received(&self, id: i64) -> Result<(), AppError> {
        let mut state = self.lock()?;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))?;
        user.received_email_count += 1;
        Ok(())
    }
}

#[async_trait]
impl LeakRepository for MemoryStore {
    async fn record_leak(&self, leak: LeakRecord) -> Result<(), AppError> {
        let mut state = self.lock()?;
        if let Some(user) = state.users.iter_mut().find(|u| u.id == leak.recipient_id) {
            user.leak_count += 1;
            if leak.is_third_party() {
                user.third_party_leak_count += 1;
            }
        }
        state.leaks.push(leak);
        Ok(())
    }

    async fn list_for_recipient(&self, recipient_id: i64) -> Result<Vec<LeakRecord>, AppError> {
        Ok(self
            .lock()?
            .leaks
            .iter()
            .filter(|l| l.recipient_id == recipient_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RedirectRepository for MemoryStore {
    async fn record_hops(&self, hops: Vec<RedirectHop>) -> Result<(), AppError> {
        self.lock()?.hops.extend(hops);
        Ok(())
    }

    async fn hops_for(&self, requested_url: &str) -> Result<Vec<RedirectHop>, AppError> {
        Ok(self
            .lock()?
            .hops
            .iter()
            .filter(|h| h.requested_url == requested_url)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LinkGroupRepository for MemoryStore {
    async fn create(&self, group: NewLinkGroup) -> Result<LinkGroup, AppError> {
        let mut state = self.lock()?;
        state.next_group_id += 1;
        let group = LinkGroup::new(
            state.next_group_id,
            group.origin.sender_domain,
            group.origin.sender_address,
            group.origin.recipient_id,
            group.urls.iter().map(|u| truncate_url(u)).collect(),
        );
        state.link_groups.push(group.clone());
        Ok(group)
    }

    async fn fetch_random(&self) -> Result<Option<LinkGroup>, AppError> {
        let state = self.lock()?;
        if state.link_groups.is_empty() {
            return Ok(None);
        }
        let idx = rand::rng().random_range(0..state.link_groups.len());
        Ok(state.link_groups.get(idx).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<LinkGroup>, AppError> {
        Ok(self.lock()?.link_groups.iter().find(|g| g.id == id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.lock()?.link_groups.retain(|g| g.id != id);
        Ok(())
    }
}
