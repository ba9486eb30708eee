//! Repository trait definitions for the domain layer.
//!
//! These traits abstract every storage operation the detection pipeline
//! needs. Implementations live in `crate::infrastructure::persistence`:
//! a PostgreSQL backend and an in-process store used when no database is
//! configured.
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - Issued addresses and their counters
//! - [`LeakRepository`] - Append-only leak records
//! - [`RedirectRepository`] - Hops of followed redirect chains
//! - [`LinkGroupRepository`] - URLs queued for a browser visit
//! - [`OrganizationDirectory`] - Domain to organization labels
//!
//! Mock implementations are generated via `mockall` under `cfg(test)`.

pub mod leak_repository;
pub mod link_group_repository;
pub mod organization_directory;
pub mod redirect_repository;
pub mod user_repository;

pub use leak_repository::LeakRepository;
pub use link_group_repository::LinkGroupRepository;
pub use organization_directory::OrganizationDirectory;
pub use redirect_repository::{RedirectHop, RedirectRepository, chain_to_hops};
pub use user_repository::UserRepository;

#[cfg(test)]
pub use leak_repository::MockLeakRepository;
#[cfg(test)]
pub use link_group_repository::MockLinkGroupRepository;
#[cfg(test)]
pub use organization_directory::MockOrganizationDirectory;
#[cfg(test)]
pub use redirect_repository::MockRedirectRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
