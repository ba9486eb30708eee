//! Repository trait for followed redirect chains.

use crate::domain::entities::{MessageOrigin, RedirectChain};
use crate::error::AppError;
use async_trait::async_trait;

/// One persisted hop of a redirect chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectHop {
    pub requested_url: String,
    /// 1-based position of this hop within its chain.
    pub position: i32,
    pub url: String,
    pub url_domain: String,
    pub organization: Option<String>,
    pub final_status: Option<i32>,
    pub origin: MessageOrigin,
}

/// Store of redirect chains, one row per hop.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectRepository: Send + Sync {
    /// Persists all hops of a chain in order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record_hops(&self, hops: Vec<RedirectHop>) -> Result<(), AppError>;

    /// Lists the hops recorded for one requested URL, in chain order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn hops_for(&self, requested_url: &str) -> Result<Vec<RedirectHop>, AppError>;
}

/// Flattens a chain into hop rows ready for storage.
pub fn chain_to_hops(
    chain: &RedirectChain,
    origin: &MessageOrigin,
    label: impl Fn(&str) -> (String, Option<String>),
) -> Vec<RedirectHop> {
    let final_status = chain.final_status.map(i32::from);
    chain
        .redirects
        .iter()
        .enumerate()
        .map(|(i, url)| {
            let (url_domain, organization) = label(url);
            RedirectHop {
                requested_url: crate::utils::truncate::truncate_url(&chain.requested_url),
                position: i as i32 + 1,
                url: crate::utils::truncate::truncate_url(url),
                url_domain,
                organization,
                final_status,
                origin: origin.clone(),
            }
        })
        .collect()
}
