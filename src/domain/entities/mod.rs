//! Core domain entities representing the leak-detection data model.
//!
//! Entities are plain data structures; the detection logic that produces
//! them lives in [`crate::domain::detection`].
//!
//! # Entity Types
//!
//! - [`MailUser`] - An issued disposable address and its counters
//! - [`LeakRecord`] - An encoded address observed in a URL, body or referrer
//! - [`RedirectChain`] - Hops followed by one outbound probe
//! - [`LinkGroup`] - URLs queued for a browser visit
//! - [`MessageOrigin`] - Sender/recipient provenance of an inbound message
//!
//! Creation inputs follow the `NewX` pattern (`NewMailUser`, `NewLinkGroup`).

pub mod leak;
pub mod link_group;
pub mod mail_user;
pub mod origin;
pub mod redirect_chain;

pub use leak::{LeakRecord, LeakSource};
pub use link_group::{LinkGroup, NewLinkGroup};
pub use mail_user::{MailUser, NewMailUser};
pub use origin::MessageOrigin;
pub use redirect_chain::{ObservedCookie, RedirectChain};
