//! Leak record entity: one encoded form of an address observed in one URL.

use std::fmt;

use super::origin::MessageOrigin;
use crate::utils::truncate::truncate_url;

/// Where a leaked value was observed.
///
/// The first four variants come from links found in a message body; the
/// `Link*` variants come from browser-reported traffic after a link group
/// was visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeakSource {
    Image,
    Link,
    Media,
    Import,
    LinkPost,
    LinkRequest,
    LinkReferrer,
}

impl LeakSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Link => "link",
            Self::Media => "media",
            Self::Import => "import",
            Self::LinkPost => "link-post",
            Self::LinkRequest => "link-request",
            Self::LinkReferrer => "link-referrer",
        }
    }
}

impl fmt::Display for LeakSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An observed leak, append-only.
///
/// `url` is truncated to the storage limit on construction. `url_domain` and
/// `organization` are labels attached by the recording service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeakRecord {
    pub url: String,
    pub source: LeakSource,
    pub encoding_name: String,
    pub is_redirect: bool,
    pub is_intentional: bool,
    pub sender_domain: String,
    pub sender_address: String,
    pub recipient_id: i64,
    pub url_domain: String,
    pub organization: Option<String>,
}

impl LeakRecord {
    pub fn new(
        url: &str,
        source: LeakSource,
        encoding_name: &str,
        is_redirect: bool,
        is_intentional: bool,
        origin: &MessageOrigin,
    ) -> Self {
        Self {
            url: truncate_url(url),
            source,
            encoding_name: encoding_name.to_string(),
            is_redirect,
            is_intentional,
            sender_domain: origin.sender_domain.clone(),
            sender_address: origin.sender_address.clone(),
            recipient_id: origin.recipient_id,
            url_domain: String::new(),
            organization: None,
        }
    }

    /// Attaches the registrable domain of the URL and its owner, if known.
    pub fn with_labels(mut self, url_domain: String, organization: Option<String>) -> Self {
        self.url_domain = url_domain;
        self.organization = organization;
        self
    }

    /// True when the URL belongs to a domain other than the sender's.
    pub fn is_third_party(&self) -> bool {
        !self.url_domain.is_empty() && self.url_domain != self.sender_domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> MessageOrigin {
        MessageOrigin::new("shop.com", "news@shop.com", 3)
    }

    #[test]
    fn test_leak_source_names() {
        assert_eq!(LeakSource::Image.as_str(), "image");
        assert_eq!(LeakSource::Link.as_str(), "link");
        assert_eq!(LeakSource::LinkPost.to_string(), "link-post");
        assert_eq!(LeakSource::LinkReferrer.to_string(), "link-referrer");
    }

    #[test]
    fn test_leak_record_copies_origin() {
        let leak = LeakRecord::new(
            "https://t.example/p?e=abc",
            LeakSource::Image,
            "md5",
            false,
            true,
            &origin(),
        );

        assert_eq!(leak.sender_domain, "shop.com");
        assert_eq!(leak.sender_address, "news@shop.com");
        assert_eq!(leak.recipient_id, 3);
        assert_eq!(leak.encoding_name, "md5");
        assert!(leak.url_domain.is_empty());
        assert!(leak.organization.is_none());
    }

    #[test]
    fn test_leak_record_truncates_long_url() {
        let url = format!("https://t.example/?q={}", "x".repeat(5000));
        let leak = LeakRecord::new(&url, LeakSource::Link, "raw", false, true, &origin());

        assert_eq!(leak.url.len(), 2048);
        assert!(leak.url.ends_with("[TRUNCATED]"));
    }

    #[test]
    fn test_third_party_detection() {
        let first = LeakRecord::new("https://shop.com/a", LeakSource::Link, "raw", false, true, &origin())
            .with_labels("shop.com".to_string(), None);
        let third = LeakRecord::new("https://ads.net/a", LeakSource::Link, "raw", false, true, &origin())
            .with_labels("ads.net".to_string(), Some("Ads Inc".to_string()));
        let unknown = LeakRecord::new("https://x/a", LeakSource::Link, "raw", false, true, &origin());

        assert!(!first.is_third_party());
        assert!(third.is_third_party());
        assert!(!unknown.is_third_party());
    }
}
