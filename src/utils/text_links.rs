//! URL detection in free text.

use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"']+"#).expect("valid url regex")
});

/// Characters stripped from the end of a detected URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}'];

/// Extracts URLs from plain text in order of appearance.
///
/// Recognizes `http://`, `https://` and `www.` prefixes. A `www.` match is
/// returned with an `http://` scheme so it can be parsed as an absolute URL.
pub fn extract_links_from_text(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .filter_map(|m| {
            let raw = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            if raw.is_empty() {
                return None;
            }
            if raw.len() >= 4 && raw[..4].eq_ignore_ascii_case("www.") {
                Some(format!("http://{raw}"))
            } else {
                Some(raw.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_multiple_links() {
        let text = "Confirm: https://shop.com/confirm?t=abc\nOr visit http://shop.com/help.";
        let links = extract_links_from_text(text);

        assert_eq!(
            links,
            vec![
                "https://shop.com/confirm?t=abc".to_string(),
                "http://shop.com/help".to_string(),
            ]
        );
    }

    #[test]
    fn test_www_prefix_gets_scheme() {
        let links = extract_links_from_text("see www.shop.com/x, thanks");
        assert_eq!(links, vec!["http://www.shop.com/x".to_string()]);
    }

    #[test]
    fn test_stops_at_angle_brackets_and_quotes() {
        let links = extract_links_from_text(r#"<https://a.com/b> "https://c.com/d""#);
        assert_eq!(
            links,
            vec!["https://a.com/b".to_string(), "https://c.com/d".to_string()]
        );
    }

    #[test]
    fn test_no_links() {
        assert!(extract_links_from_text("nothing to see here").is_empty());
        assert!(extract_links_from_text("").is_empty());
    }
}
