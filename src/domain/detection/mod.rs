//! Leak-detection core.
//!
//! Pure, synchronous building blocks used by the analyzer and the report
//! service. Nothing here performs I/O; randomness is always passed in.
//!
//! - [`encoding`] - The 25 encoded forms of an address searched for everywhere
//! - [`scanner`] - Substring containment against a catalog
//! - [`extractor`] - HTML/CSS link extraction
//! - [`probe_selector`] - Which images to fetch
//! - [`revisit`] - Which anchors to queue for a browser visit
//! - [`confirmation`] - Confirmation link in a recipient's first message
//! - [`classifier`] - Intentional vs. accidental leaks in browser reports

pub mod classifier;
pub mod confirmation;
pub mod encoding;
pub mod extractor;
pub mod murmur;
pub mod probe_selector;
pub mod revisit;
pub mod scanner;

pub use classifier::{Classification, ReportedEvent, classify_event, classify_reported_events};
pub use confirmation::{ConfirmationInput, find_confirmation_link};
pub use encoding::{EncodedValue, EncodingCatalog};
pub use extractor::{ExtractedContent, ExtractedLink, LinkKind, extract};
pub use probe_selector::{ProbeCandidate, ProbeReason, select_probes};
pub use revisit::{group_by_prefix, select_revisit_urls};
pub use scanner::{matches_any, scan};
