//! Redirect chain produced by one outbound probe.

/// A cookie set by a server while a chain was being followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedCookie {
    /// URL of the response that set the cookie.
    pub url: String,
    pub name: String,
    pub value: String,
}

impl ObservedCookie {
    pub fn new(url: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The ordered hops followed from a requested URL to its terminal response.
///
/// Owned by the caller that issued the fetch; never shared between probes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectChain {
    pub requested_url: String,
    /// Absolute redirect targets in the order they were followed.
    pub redirects: Vec<String>,
    /// Status of the last response received, `None` if the first hop timed out.
    pub final_status: Option<u16>,
    pub cookies: Vec<ObservedCookie>,
}

impl RedirectChain {
    pub fn new(requested_url: impl Into<String>) -> Self {
        Self {
            requested_url: requested_url.into(),
            redirects: Vec::new(),
            final_status: None,
            cookies: Vec::new(),
        }
    }

    pub fn has_redirects(&self) -> bool {
        !self.redirects.is_empty()
    }
}
