//! Registrable-domain labeling for URLs.

use std::path::Path;

use anyhow::Context;
use publicsuffix::{List, Psl};
use url::Url;

use super::truncate::MAX_DOMAIN_LENGTH;

/// Reduces URLs to their registrable domain ("private domain + public suffix").
///
/// With a Public Suffix List loaded, `a.b.example.co.uk` becomes
/// `example.co.uk`. Without one, the last two labels of the host are used.
/// Hosts that are themselves a public suffix, IP addresses and hosts the list
/// cannot classify are returned unchanged.
#[derive(Default)]
pub struct DomainLabeler {
    list: Option<List>,
}

impl DomainLabeler {
    /// Labeler using the two-label fallback only.
    pub fn new() -> Self {
        Self { list: None }
    }

    pub fn with_list(list: List) -> Self {
        Self { list: Some(list) }
    }

    /// Parses a Public Suffix List in its standard text format.
    pub fn from_list_str(contents: &str) -> anyhow::Result<Self> {
        let list: List = contents
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid public suffix list: {e}"))?;
        Ok(Self::with_list(list))
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read public suffix list {}", path.display()))?;
        Self::from_list_str(&contents)
    }

    /// Returns the registrable domain of `url`.
    ///
    /// `None` if the URL has no host or the domain is longer than
    /// [`MAX_DOMAIN_LENGTH`].
    pub fn domain_of_url(&self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?;
        if host.is_empty() {
            return None;
        }
        let domain = self.domain_of_host(host);
        (domain.len() <= MAX_DOMAIN_LENGTH).then_some(domain)
    }

    /// Same as [`Self::domain_of_url`] but yields an empty string instead of `None`.
    pub fn label(&self, url: &str) -> String {
        self.domain_of_url(url).unwrap_or_default()
    }

    pub fn domain_of_host(&self, host: &str) -> String {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        if host.starts_with('[') || host.parse::<std::net::IpAddr>().is_ok() {
            return host;
        }

        match &self.list {
            Some(list) => {
                if let Some(domain) = list.domain(host.as_bytes()) {
                    return String::from_utf8_lossy(domain.as_bytes()).into_owned();
                }
                host
            }
            None => last_two_labels(&host),
        }
    }
}

fn last_two_labels(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() <= 2 {
        return host.to_string();
    }
    labels[labels.len() - 2..].join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = "// test list\ncom\nuk\nco.uk\n";

    #[test]
    fn test_fallback_uses_last_two_labels() {
        let labeler = DomainLabeler::new();

        assert_eq!(
            labeler.domain_of_url("https://a.b.tracker.com/p.gif"),
            Some("tracker.com".to_string())
        );
        assert_eq!(
            labeler.domain_of_url("http://example.com:8080/"),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_list_handles_multi_label_suffix() {
        let labeler = DomainLabeler::from_list_str(LIST).unwrap();

        assert_eq!(
            labeler.domain_of_url("https://news.shop.co.uk/x"),
            Some("shop.co.uk".to_string())
        );
        assert_eq!(
            labeler.domain_of_url("https://www.shop.com/"),
            Some("shop.com".to_string())
        );
    }

    #[test]
    fn test_public_suffix_host_returned_unchanged() {
        let labeler = DomainLabeler::from_list_str(LIST).unwrap();
        assert_eq!(labeler.domain_of_host("co.uk"), "co.uk");
    }

    #[test]
    fn test_ip_hosts_unchanged() {
        let labeler = DomainLabeler::new();

        assert_eq!(labeler.domain_of_host("192.168.1.10"), "192.168.1.10");
        assert_eq!(
            labeler.domain_of_url("http://10.0.0.1/a"),
            Some("10.0.0.1".to_string())
        );
    }

    #[test]
    fn test_overlong_domain_is_dropped() {
        let labeler = DomainLabeler::from_list_str(LIST).unwrap();
        let long = format!("{}.com", "a".repeat(MAX_DOMAIN_LENGTH));
        let url = format!("http://{long}/p");

        assert_eq!(labeler.domain_of_url(&url), None);
        assert_eq!(labeler.label(&url), "");

        let fits = format!("{}.com", "a".repeat(MAX_DOMAIN_LENGTH - 4));
        assert_eq!(labeler.domain_of_url(&format!("http://{fits}/")), Some(fits));
    }

    #[test]
    fn test_url_without_host() {
        let labeler = DomainLabeler::new();

        assert_eq!(labeler.domain_of_url("mailto:a@b.com"), None);
        assert_eq!(labeler.domain_of_url("not a url"), None);
        assert_eq!(labeler.label("not a url"), "");
    }
}
