//! Detection of the account-confirmation link in a recipient's first message.

use super::extractor::{ExtractedContent, ExtractedLink};
use crate::utils::text_links::extract_links_from_text;

const PRIMARY_KEYWORDS: &[&str] = &["confirm", "verify", "validate", "activate"];
const SECONDARY_KEYWORDS: &[&str] = &["subscribe", "click"];
const LINK_TEXT_BLACKLIST: &[&str] = &["unsubscribe", "view", "cancel", "deactivate"];
const LINK_URL_BLACKLIST: &[&str] = &["unsubscribe", "deactivate"];
const SUBJECT_BLACKLIST: &[&str] = &["confirmed", "subscribed", "activated"];

/// The parts of a message the detector looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfirmationInput<'a> {
    pub subject: &'a str,
    /// Extracted HTML body, if the message has one.
    pub html: Option<&'a ExtractedContent>,
    /// Plain-text body, if the message has one.
    pub text: Option<&'a str>,
}

/// Returns the URL that most likely confirms the subscription, if any.
///
/// HTML with at least one anchor is inspected through its anchors; anything
/// else falls back to the plain-text body, where the longest URL wins.
pub fn find_confirmation_link(input: ConfirmationInput<'_>) -> Option<String> {
    let subject = input.subject.to_lowercase();
    let subject_matches =
        contains_any(&subject, PRIMARY_KEYWORDS) && !contains_any(&subject, SUBJECT_BLACKLIST);

    match input.html {
        Some(html) if !html.anchors.is_empty() => from_html(html, subject_matches),
        _ => from_text(input.text?, subject_matches),
    }
}

fn from_html(html: &ExtractedContent, subject_matches: bool) -> Option<String> {
    if !subject_matches && !contains_any(&html.text.to_lowercase(), PRIMARY_KEYWORDS) {
        return None;
    }

    if let [only] = html.anchors.as_slice() {
        return passes_blacklists(only).then(|| only.url.clone());
    }

    [PRIMARY_KEYWORDS, SECONDARY_KEYWORDS]
        .iter()
        .find_map(|keywords| {
            html.anchors.iter().find(|link| {
                contains_any(&anchor_text(link), keywords) && passes_blacklists(link)
            })
        })
        .map(|link| link.url.clone())
}

fn from_text(text: &str, subject_matches: bool) -> Option<String> {
    let lower = text.to_lowercase();
    if !subject_matches && !contains_any(&lower, PRIMARY_KEYWORDS) {
        return None;
    }
    if contains_any(&lower, LINK_TEXT_BLACKLIST) {
        return None;
    }

    let mut longest: Option<String> = None;
    for link in extract_links_from_text(text) {
        if longest.as_ref().is_none_or(|l| link.len() > l.len()) {
            longest = Some(link);
        }
    }
    longest
}

fn passes_blacklists(link: &ExtractedLink) -> bool {
    !contains_any(&anchor_text(link), LINK_TEXT_BLACKLIST)
        && !contains_any(&link.url.to_lowercase(), LINK_URL_BLACKLIST)
}

fn anchor_text(link: &ExtractedLink) -> String {
    link.text.as_deref().unwrap_or_default().to_lowercase()
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::detection::extractor::extract;

    #[test]
    fn test_single_anchor_selected_when_subject_matches() {
        let html = extract(r#"<a href="https://shop.com/c?t=1">Go</a>"#);
        let url = find_confirmation_link(ConfirmationInput {
            subject: "Please Confirm your email",
            html: Some(&html),
            text: None,
        });

        assert_eq!(url.as_deref(), Some("https://shop.com/c?t=1"));
    }

    #[test]
    fn test_subject_blacklist_blocks_subject_match() {
        let html = extract(r#"<a href="https://shop.com/c?t=1">Go</a>"#);
        let url = find_confirmation_link(ConfirmationInput {
            subject: "Your account is confirmed",
            html: Some(&html),
            text: None,
        });

        assert!(url.is_none());
    }

    #[test]
    fn test_body_keyword_is_enough() {
        let html = extract(r#"<p>Click below to verify.</p><a href="https://shop.com/v">Here</a>"#);
        let url = find_confirmation_link(ConfirmationInput {
            subject: "Welcome",
            html: Some(&html),
            text: None,
        });

        assert_eq!(url.as_deref(), Some("https://shop.com/v"));
    }

    #[test]
    fn test_single_anchor_blacklisted() {
        let html = extract(r#"<a href="https://shop.com/unsubscribe">Stop</a>"#);
        let url = find_confirmation_link(ConfirmationInput {
            subject: "Confirm",
            html: Some(&html),
            text: None,
        });
        assert!(url.is_none());

        let html = extract(r#"<a href="https://shop.com/web">View in browser</a>"#);
        let url = find_confirmation_link(ConfirmationInput {
            subject: "Confirm",
            html: Some(&html),
            text: None,
        });
        assert!(url.is_none());
    }

    #[test]
    fn test_multiple_anchors_prefer_primary_keyword() {
        let html = extract(
            r#"<a href="https://shop.com/view">View online</a>
               <a href="https://shop.com/sub">Click to subscribe</a>
               <a href="https://shop.com/ok?t=9">Verify address</a>"#,
        );
        let url = find_confirmation_link(ConfirmationInput {
            subject: "Action required: confirm",
            html: Some(&html),
            text: None,
        });

        assert_eq!(url.as_deref(), Some("https://shop.com/ok?t=9"));
    }

    #[test]
    fn test_multiple_anchors_fall_back_to_secondary_keyword() {
        let html = extract(
            r#"<a href="https://shop.com/unsubscribe">Unsubscribe</a>
               <a href="https://shop.com/go">Click here</a>"#,
        );
        let url = find_confirmation_link(ConfirmationInput {
            subject: "Activate your account",
            html: Some(&html),
            text: None,
        });

        assert_eq!(url.as_deref(), Some("https://shop.com/go"));
    }

    #[test]
    fn test_no_keywords_anywhere() {
        let html = extract(r#"<p>Weekly deals</p><a href="https://shop.com/d">Deals</a>"#);
        let url = find_confirmation_link(ConfirmationInput {
            subject: "Newsletter",
            html: Some(&html),
            text: None,
        });

        assert!(url.is_none());
    }

    #[test]
    fn test_plain_text_picks_longest_url() {
        let url = find_confirmation_link(ConfirmationInput {
            subject: "Verify your email",
            html: None,
            text: Some("Open https://shop.com/a or https://shop.com/confirm?token=abcdef now."),
        });

        assert_eq!(url.as_deref(), Some("https://shop.com/confirm?token=abcdef"));
    }

    #[test]
    fn test_plain_text_blacklist_aborts() {
        let url = find_confirmation_link(ConfirmationInput {
            subject: "Verify your email",
            html: None,
            text: Some("Verify: https://shop.com/v\nTo cancel, reply STOP."),
        });

        assert!(url.is_none());
    }

    #[test]
    fn test_html_without_anchors_uses_plain_text() {
        let html = extract("<p>Confirm by visiting the link in the text part</p>");
        let url = find_confirmation_link(ConfirmationInput {
            subject: "Hello",
            html: Some(&html),
            text: Some("Confirm here: https://shop.com/confirm/1"),
        });

        assert_eq!(url.as_deref(), Some("https://shop.com/confirm/1"));
    }

    #[test]
    fn test_no_body_at_all() {
        let url = find_confirmation_link(ConfirmationInput {
            subject: "Confirm",
            html: None,
            text: None,
        });
        assert!(url.is_none());
    }
}
