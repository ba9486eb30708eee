//! Repository trait for issued mail users.

use crate::domain::entities::{MailUser, NewMailUser};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for issued disposable addresses.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryStore`] - In-process store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a newly issued address.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the address is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_user: NewMailUser) -> Result<MailUser, AppError>;

    /// Finds a user by exact (case-sensitive) address.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_email(&self, email: &str) -> Result<Option<MailUser>, AppError>;

    /// Finds a user by its database ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<MailUser>, AppError>;

    /// Returns true if the address has already been issued.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// Increments the received-message counter after a message is analyzed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_received(&self, id: i64) -> Result<(), AppError>;
}
