//! Utility functions shared across layers.
//!
//! - [`address_generator`] - Disposable address generation
//! - [`domain_name`] - Registrable-domain labeling via the Public Suffix List
//! - [`text_links`] - URL detection in plain text
//! - [`truncate`] - Storage-bound truncation with a marker suffix

pub mod address_generator;
pub mod domain_name;
pub mod text_links;
pub mod truncate;
