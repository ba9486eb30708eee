//! Lookup of the organization owning a registrable domain.

/// Maps registrable domains to the organization that owns them.
///
/// Loaded once at startup and read-only afterwards.
#[cfg_attr(test, mockall::automock)]
pub trait OrganizationDirectory: Send + Sync {
    fn lookup(&self, domain: &str) -> Option<String>;
}
