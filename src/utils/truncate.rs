//! Truncation of values destined for bounded storage columns.

/// Maximum stored length of a URL.
pub const MAX_URL_LENGTH: usize = 2048;

/// Maximum stored length of a domain name.
pub const MAX_DOMAIN_LENGTH: usize = 255;

/// Suffix appended to a value that was cut short.
pub const TRUNCATION_MARKER: &str = "[TRUNCATED]";

/// Cuts `value` to at most `max` bytes, ending with [`TRUNCATION_MARKER`].
///
/// Values within the limit are returned unchanged. The cut never splits a
/// UTF-8 character, so the result may be a few bytes shorter than `max`.
pub fn truncate_with_marker(value: &str, max: usize) -> String {
    if value.len() <= max {
        return value.to_string();
    }

    let mut end = max.saturating_sub(TRUNCATION_MARKER.len());
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}{}", &value[..end], TRUNCATION_MARKER)
}

pub fn truncate_url(url: &str) -> String {
    truncate_with_marker(url, MAX_URL_LENGTH)
}

pub fn truncate_domain(domain: &str) -> String {
    truncate_with_marker(domain, MAX_DOMAIN_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_values_unchanged() {
        assert_eq!(truncate_url("https://example.com/"), "https://example.com/");
        assert_eq!(truncate_domain("example.com"), "example.com");
    }

    #[test]
    fn test_value_at_limit_unchanged() {
        let url = "a".repeat(MAX_URL_LENGTH);
        assert_eq!(truncate_url(&url), url);
    }

    #[test]
    fn test_long_url_truncated_with_marker() {
        let url = "a".repeat(MAX_URL_LENGTH + 1);
        let truncated = truncate_url(&url);

        assert_eq!(truncated.len(), MAX_URL_LENGTH);
        assert!(truncated.ends_with(TRUNCATION_MARKER));
        assert!(truncated.starts_with("aaaa"));
    }

    #[test]
    fn test_long_domain_truncated_with_marker() {
        let domain = format!("{}.com", "d".repeat(300));
        let truncated = truncate_domain(&domain);

        assert_eq!(truncated.len(), MAX_DOMAIN_LENGTH);
        assert!(truncated.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let value = "é".repeat(20);
        let truncated = truncate_with_marker(&value, 16);

        assert!(truncated.ends_with(TRUNCATION_MARKER));
        assert!(truncated.len() <= 16);
    }
}
