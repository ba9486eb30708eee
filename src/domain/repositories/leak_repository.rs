//! Repository trait for observed leaks.

use crate::domain::entities::LeakRecord;
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only store of [`LeakRecord`]s.
///
/// Recording a leak also bumps the recipient's `leak_count`, and its
/// `third_party_leak_count` when [`LeakRecord::is_third_party`] holds. Both
/// updates happen atomically with the insert.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeakRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record_leak(&self, leak: LeakRecord) -> Result<(), AppError>;

    /// Lists leaks recorded for one recipient, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_for_recipient(&self, recipient_id: i64) -> Result<Vec<LeakRecord>, AppError>;
}
