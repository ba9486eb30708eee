//! Repository trait for pending link groups.

use crate::domain::entities::{LinkGroup, NewLinkGroup};
use crate::error::AppError;
use async_trait::async_trait;

/// Store of link groups awaiting a browser visit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkGroupRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, group: NewLinkGroup) -> Result<LinkGroup, AppError>;

    /// Returns an arbitrary pending group, or `None` when the queue is empty.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn fetch_random(&self) -> Result<Option<LinkGroup>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<LinkGroup>, AppError>;

    /// Removes a group after its report was processed.
    ///
    /// Deleting a missing group is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
