//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`http`] - Outbound redirect-following client
//! - [`mail`] - MIME message decoding
//! - [`organizations`] - Domain to organization directory
//! - [`persistence`] - PostgreSQL and in-memory repositories

pub mod http;
pub mod mail;
pub mod organizations;
pub mod persistence;
