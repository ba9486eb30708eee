//! Redirect-following HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode, redirect};
use url::Url;

use super::fetcher::{FetchError, FetchResult, PageFetcher};
use crate::domain::entities::{ObservedCookie, RedirectChain};

/// Redirect statuses that are followed.
const REDIRECT_STATUSES: [StatusCode; 4] = [
    StatusCode::MOVED_PERMANENTLY,
    StatusCode::FOUND,
    StatusCode::SEE_OTHER,
    StatusCode::USE_PROXY,
];

pub const DEFAULT_MAX_REDIRECTS: usize = 50;
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_ENCODING: &str = "gzip, deflate, sdch, br";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.8";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/56.0.2924.87 Safari/537.36";

/// Follows redirect chains hop by hop.
///
/// Automatic redirect handling is disabled so every hop can be recorded.
/// Each [`fetch`](PageFetcher::fetch) owns a fresh cookie jar: cookies set
/// by hop N are sent on hop N+1 of the same chain and nowhere else.
#[derive(Clone)]
pub struct RedirectClient {
    client: reqwest::Client,
    max_redirects: usize,
    read_timeout: Duration,
}

impl RedirectClient {
    pub fn new() -> FetchResult<Self> {
        Self::builder().build()
    }

    pub fn builder() -> RedirectClientBuilder {
        RedirectClientBuilder::default()
    }

    async fn follow(&self, start: Url, jar: &Jar) -> FetchResult<RedirectChain> {
        let mut chain = RedirectChain::new(start.as_str());
        let mut current = start;

        loop {
            let mut request = self.client.get(current.clone()).timeout(self.read_timeout);
            if let Some(cookies) = jar.cookies(&current) {
                request = request.header(header::COOKIE, cookies);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    tracing::debug!(url = %current, hops = chain.redirects.len(), "Fetch timed out, keeping partial chain");
                    return Ok(chain);
                }
                Err(e) => {
                    return Err(FetchError::Transport {
                        url: current.to_string(),
                        source: e,
                    });
                }
            };

            let status = response.status();
            chain.final_status = Some(status.as_u16());
            record_cookies(&mut chain, jar, &current, &response);

            if !REDIRECT_STATUSES.contains(&status) {
                return Ok(chain);
            }

            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| FetchError::MissingLocation {
                    url: current.to_string(),
                })?;

            let target = current.join(location.trim()).map_err(|e| FetchError::InvalidUrl {
                url: location.to_string(),
                reason: e.to_string(),
            })?;
            if !matches!(target.scheme(), "http" | "https") {
                return Err(FetchError::UnsupportedScheme {
                    from: current.to_string(),
                    target: target.to_string(),
                });
            }
            if chain.redirects.len() >= self.max_redirects {
                return Err(FetchError::TooManyRedirects {
                    url: chain.requested_url.clone(),
                    limit: self.max_redirects,
                });
            }

            tracing::trace!(from = %current, to = %target, status = status.as_u16(), "Following redirect");
            chain.redirects.push(target.to_string());
            current = target;
        }
    }
}

fn record_cookies(chain: &mut RedirectChain, jar: &Jar, url: &Url, response: &Response) {
    chain.cookies.extend(
        response
            .cookies()
            .map(|c| ObservedCookie::new(url.as_str(), c.name(), c.value())),
    );

    let mut set_cookies = response.headers().get_all(header::SET_COOKIE).iter().peekable();
    if set_cookies.peek().is_some() {
        jar.set_cookies(&mut set_cookies, url);
    }
}

#[async_trait]
impl PageFetcher for RedirectClient {
    async fn fetch(&self, url: &str) -> FetchResult<RedirectChain> {
        let start = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(start.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: "scheme is not http(s)".to_string(),
            });
        }

        let jar = Jar::default();
        let mut chain = self.follow(start, &jar).await?;
        chain.requested_url = url.to_string();
        Ok(chain)
    }
}

/// Builder for [`RedirectClient`].
pub struct RedirectClientBuilder {
    max_redirects: usize,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl Default for RedirectClientBuilder {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            connect_timeout: CONNECT_TIMEOUT,
            read_timeout: READ_TIMEOUT,
        }
    }
}

impl RedirectClientBuilder {
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn build(self) -> FetchResult<RedirectClient> {
        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .connect_timeout(self.connect_timeout)
            .default_headers(default_headers())
            .build()
            .map_err(FetchError::Client)?;

        Ok(RedirectClient {
            client,
            max_redirects: self.max_redirects,
            read_timeout: self.read_timeout,
        })
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static(ACCEPT_ENCODING));
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE));
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers
}
