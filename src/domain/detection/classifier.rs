//! Classification of browser-reported network events.
//!
//! A leak is intentional when the encoded address shows up on its own, and
//! accidental when it only appears because the page's own URL (which may
//! carry the address) was echoed into the request.

use url::form_urlencoded::byte_serialize;

use super::encoding::EncodingCatalog;
use crate::domain::entities::{LeakRecord, LeakSource, LinkGroup};

/// One network request observed by the browser agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportedEvent {
    pub url: String,
    pub top_level_url: Option<String>,
    pub referrer: Option<String>,
    pub post_body: Option<String>,
}

impl ReportedEvent {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// Result of classifying one event against one encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub source: LeakSource,
    pub encoding_name: &'static str,
    pub is_intentional: bool,
}

/// Classifies one event against every catalog entry.
///
/// Per entry, the POST body is checked first, then the request URL, then the
/// referrer; the first place the value occurs decides the leak type.
pub fn classify_event(event: &ReportedEvent, catalog: &EncodingCatalog) -> Vec<Classification> {
    let top = event.top_level_url.as_deref().unwrap_or_default();

    catalog
        .iter()
        .filter(|entry| !entry.value.is_empty())
        .filter_map(|entry| {
            let value = entry.value.as_str();
            let (source, is_intentional) =
                if let Some(body) = event.post_body.as_deref().filter(|b| b.contains(value)) {
                    let intentional =
                        !url_contains(top, value) || more_frequent_than_url(value, top, body);
                    (LeakSource::LinkPost, intentional)
                } else if event.url.contains(value) {
                    (LeakSource::LinkRequest, request_is_intentional(&event.url, top, value))
                } else if event.referrer.as_deref().is_some_and(|r| r.contains(value)) {
                    (LeakSource::LinkReferrer, false)
                } else {
                    return None;
                };

            Some(Classification {
                source,
                encoding_name: entry.name,
                is_intentional,
            })
        })
        .collect()
}

/// Classifies every reported event of a visited link group into leak records.
///
/// Events for the group's own base URLs are skipped. Every match is recorded
/// with `is_redirect` set, since it was observed outside the message.
pub fn classify_reported_events(
    group: &LinkGroup,
    events: &[ReportedEvent],
    catalog: &EncodingCatalog,
) -> Vec<LeakRecord> {
    let origin = group.origin();
    events
        .iter()
        .filter(|event| !group.is_base_url(&event.url))
        .flat_map(|event| {
            classify_event(event, catalog).into_iter().map(|c| {
                LeakRecord::new(
                    &event.url,
                    c.source,
                    c.encoding_name,
                    true,
                    c.is_intentional,
                    &origin,
                )
            })
        })
        .collect()
}

fn request_is_intentional(url: &str, top: &str, value: &str) -> bool {
    if !url_contains(top, value) {
        return true;
    }
    if url::Url::parse(url).is_err() {
        return true;
    }

    match raw_query(url) {
        None => true,
        Some(query) if !query.contains(value) => true,
        Some(query) if url.replace(query, "").contains(value) => true,
        Some(query) => more_frequent_than_url(value, top, query),
    }
}

/// The raw query of `url`, between the first `?` and the fragment.
fn raw_query(url: &str) -> Option<&str> {
    let start = url.find('?')? + 1;
    let rest = &url[start..];
    let end = rest.find('#').unwrap_or(rest.len());
    Some(&rest[..end])
}

/// True if `url` contains `value` as is, form-encoded or form-decoded.
fn url_contains(url: &str, value: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    url.contains(value) || form_encode(url).contains(value) || form_decode(url).contains(value)
}

/// True if `value` still occurs in `haystack` once every copy of `url`
/// (plain and form-encoded) has been removed.
fn more_frequent_than_url(value: &str, url: &str, haystack: &str) -> bool {
    if url.is_empty() {
        return true;
    }

    haystack
        .replace(url, "")
        .replace(&form_encode(url), "")
        .contains(value)
}

fn form_encode(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}

fn form_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let decoded = bytes
                    .get(i + 1..i + 3)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                if let Some(b) = decoded {
                    out.push(b);
                    i += 3;
                    continue;
                }
                out.push(b'%');
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "jdoe@mail.test";

    fn catalog() -> EncodingCatalog {
        EncodingCatalog::for_address(ADDRESS)
    }

    fn md5() -> String {
        catalog().get("md5").unwrap().value.clone()
    }

    fn find<'a>(results: &'a [Classification], name: &str) -> Option<&'a Classification> {
        results.iter().find(|c| c.encoding_name == name)
    }

    #[test]
    fn test_post_body_without_top_level_echo_is_intentional() {
        let event = ReportedEvent {
            url: "https://collect.example/e".to_string(),
            top_level_url: Some("https://shop.com/welcome".to_string()),
            referrer: None,
            post_body: Some(format!("uid={}", md5())),
        };

        let results = classify_event(&event, &catalog());
        let md5 = find(&results, "md5").unwrap();
        assert_eq!(md5.source, LeakSource::LinkPost);
        assert!(md5.is_intentional);
    }

    #[test]
    fn test_post_body_echoing_top_level_url_is_accidental() {
        let top = format!("https://shop.com/welcome?e={ADDRESS}");
        let event = ReportedEvent {
            url: "https://collect.example/e".to_string(),
            top_level_url: Some(top.clone()),
            referrer: None,
            post_body: Some(format!("page={}", form_encode(&top))),
        };

        let results = classify_event(&event, &catalog());
        let raw = find(&results, "urlencoded").unwrap();
        assert_eq!(raw.source, LeakSource::LinkPost);
        assert!(!raw.is_intentional);
    }

    #[test]
    fn test_post_body_with_extra_copy_is_intentional() {
        let top = format!("https://shop.com/welcome?e={ADDRESS}");
        let event = ReportedEvent {
            url: "https://collect.example/e".to_string(),
            top_level_url: Some(top.clone()),
            referrer: None,
            post_body: Some(format!("page={top}&email={ADDRESS}")),
        };

        let results = classify_event(&event, &catalog());
        let raw = find(&results, "raw").unwrap();
        assert!(raw.is_intentional);
    }

    #[test]
    fn test_request_url_when_top_level_contains_value_outside_query() {
        let top = format!("https://shop.com/u/{}/profile", md5());
        let event = ReportedEvent {
            url: format!("https://ads.example/{}/px.gif", md5()),
            top_level_url: Some(top),
            referrer: None,
            post_body: None,
        };

        let results = classify_event(&event, &catalog());
        let md5 = find(&results, "md5").unwrap();
        assert_eq!(md5.source, LeakSource::LinkRequest);
        assert!(md5.is_intentional);
    }

    #[test]
    fn test_request_url_echoing_top_level_in_query_is_accidental() {
        let top = format!("https://shop.com/welcome?h={}", md5());
        let event = ReportedEvent {
            url: format!("https://analytics.example/collect?dl={}", form_encode(&top)),
            top_level_url: Some(top),
            referrer: None,
            post_body: None,
        };

        let results = classify_event(&event, &catalog());
        let md5 = find(&results, "md5").unwrap();
        assert_eq!(md5.source, LeakSource::LinkRequest);
        assert!(!md5.is_intentional);
    }

    #[test]
    fn test_request_url_with_own_parameter_is_intentional() {
        let top = format!("https://shop.com/welcome?h={}", md5());
        let event = ReportedEvent {
            url: format!(
                "https://analytics.example/collect?dl={}&uid={}",
                form_encode(&top),
                md5()
            ),
            top_level_url: Some(top),
            referrer: None,
            post_body: None,
        };

        let results = classify_event(&event, &catalog());
        assert!(find(&results, "md5").unwrap().is_intentional);
    }

    #[test]
    fn test_referrer_only_is_accidental() {
        let event = ReportedEvent {
            url: "https://cdn.example/lib.js".to_string(),
            top_level_url: None,
            referrer: Some(format!("https://shop.com/welcome?h={}", md5())),
            post_body: None,
        };

        let results = classify_event(&event, &catalog());
        let md5 = find(&results, "md5").unwrap();
        assert_eq!(md5.source, LeakSource::LinkReferrer);
        assert!(!md5.is_intentional);
    }

    #[test]
    fn test_no_match_yields_nothing() {
        let event = ReportedEvent::new("https://cdn.example/lib.js");
        assert!(classify_event(&event, &catalog()).is_empty());
    }

    #[test]
    fn test_post_takes_priority_over_request_url() {
        let event = ReportedEvent {
            url: format!("https://collect.example/e?u={}", md5()),
            top_level_url: None,
            referrer: None,
            post_body: Some(format!("u={}", md5())),
        };

        let results = classify_event(&event, &catalog());
        assert_eq!(find(&results, "md5").unwrap().source, LeakSource::LinkPost);
    }

    #[test]
    fn test_reported_events_skip_base_urls() {
        let base = format!("https://shop.com/track?u={}", md5());
        let group = LinkGroup::new(
            5,
            "shop.com".to_string(),
            "news@shop.com".to_string(),
            11,
            vec![base.clone()],
        );
        let events = vec![
            ReportedEvent::new(base),
            ReportedEvent::new(format!("https://ads.example/p?u={}", md5())),
        ];

        let leaks = classify_reported_events(&group, &events, &catalog());
        assert_eq!(leaks.len(), 1);
        let leak = &leaks[0];
        assert_eq!(leak.source, LeakSource::LinkRequest);
        assert_eq!(leak.encoding_name, "md5");
        assert!(leak.is_redirect);
        assert!(leak.is_intentional);
        assert_eq!(leak.recipient_id, 11);
        assert_eq!(leak.sender_domain, "shop.com");
    }

    #[test]
    fn test_form_decode() {
        assert_eq!(form_decode("a%40b.com+x"), "a@b.com x");
        assert_eq!(form_decode("100%"), "100%");
        assert_eq!(form_decode("%zz"), "%zz");
    }

    #[test]
    fn test_raw_query() {
        assert_eq!(raw_query("http://a/b?x=1#frag"), Some("x=1"));
        assert_eq!(raw_query("http://a/b"), None);
    }
}
