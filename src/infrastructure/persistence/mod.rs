//! Repository implementations.
//!
//! PostgreSQL repositories use SQLx with runtime-bound queries and embedded
//! migrations; [`MemoryStore`] provides the same semantics in process.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - Issued addresses and counters
//! - [`PgLeakRepository`] - Leak records with transactional counter updates
//! - [`PgRedirectRepository`] - Redirect hops
//! - [`PgLinkGroupRepository`] - Pending link groups
//! - [`MemoryStore`] - All of the above, in memory
//! - [`Repositories`] - The active backend as trait objects

pub mod memory_store;
pub mod pg_leak_repository;
pub mod pg_link_group_repository;
pub mod pg_redirect_repository;
pub mod pg_user_repository;
pub mod repositories;

pub use memory_store::MemoryStore;
pub use pg_leak_repository::PgLeakRepository;
pub use pg_link_group_repository::PgLinkGroupRepository;
pub use pg_redirect_repository::PgRedirectRepository;
pub use pg_user_repository::PgUserRepository;
pub use repositories::Repositories;
