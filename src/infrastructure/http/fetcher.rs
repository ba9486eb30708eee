//! Page fetcher trait and error types.

use async_trait::async_trait;

use crate::domain::entities::RedirectChain;

/// Errors that abandon a fetch.
///
/// A timeout is not among them: it ends the chain early and the partial
/// chain is returned as a success.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("redirect from {url} has no Location header")]
    MissingLocation { url: String },
    #[error("redirect from {from} to non-http target {target}")]
    UnsupportedScheme { from: String, target: String },
    #[error("more than {limit} redirects starting at {url}")]
    TooManyRedirects { url: String, limit: usize },
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Performs one outbound fetch, following redirects.
///
/// # Implementations
///
/// - [`crate::infrastructure::http::RedirectClient`] - `reqwest`-based client
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` and returns every redirect hop followed.
    ///
    /// Cookie state starts empty on every call.
    async fn fetch(&self, url: &str) -> FetchResult<RedirectChain>;
}
