//! Outbound HTTP probing.
//!
//! Provides a [`PageFetcher`] trait with one implementation:
//! - [`RedirectClient`] - Follows redirect chains manually with per-fetch cookies

mod fetcher;
mod redirect_client;

#[cfg(test)]
pub use fetcher::MockPageFetcher;
pub use fetcher::{FetchError, FetchResult, PageFetcher};
pub use redirect_client::{RedirectClient, RedirectClientBuilder};
