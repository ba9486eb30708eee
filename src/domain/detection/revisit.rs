//! Selection of anchor links to hand to the browser-driven visitor.

use rand::Rng;
use rand::seq::SliceRandom;

use super::encoding::EncodingCatalog;
use super::scanner::matches_any;

/// Most URLs a single link group may hold.
pub const MAX_REVISIT_URLS: usize = 2;

/// Anchor URLs grouped under a shared prefix, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixGroup {
    pub prefix: String,
    pub urls: Vec<String>,
}

/// Computes the grouping key of a URL.
///
/// With a `?`, the key ends at the `?` when it directly follows a `/`;
/// otherwise it ends at the nearest `/` before the character preceding the
/// `?`. Without a `?`, the key ends at the second `/` after the host
/// (`scheme://host/seg1/`). When no boundary exists the whole URL is the key.
pub fn prefix_key(url: &str) -> &str {
    let boundary = match url.find('?') {
        Some(q) => match url[..q].char_indices().next_back() {
            Some((prev, c)) if c != '/' => url[..prev].rfind('/').or(Some(q)),
            _ => Some(q),
        },
        None => {
            let start = url.find("://").map(|i| i + 3).unwrap_or(0);
            url[start..]
                .find('/')
                .map(|j| start + j)
                .and_then(|j| url[j + 1..].find('/').map(|k| j + 1 + k))
        }
    };

    match boundary {
        Some(i) => &url[..=i],
        None => url,
    }
}

/// Groups URLs by [`prefix_key`], keeping insertion order of groups and members.
pub fn group_by_prefix<'a>(urls: impl IntoIterator<Item = &'a str>) -> Vec<PrefixGroup> {
    let mut groups: Vec<PrefixGroup> = Vec::new();
    for url in urls {
        let key = prefix_key(url);
        match groups.iter_mut().find(|g| g.prefix == key) {
            Some(group) => group.urls.push(url.to_string()),
            None => groups.push(PrefixGroup {
                prefix: key.to_string(),
                urls: vec![url.to_string()],
            }),
        }
    }
    groups
}

/// Picks up to [`MAX_REVISIT_URLS`] anchor URLs worth visiting later.
///
/// From the largest prefix group (first one wins ties), after shuffling:
/// the first URL containing a catalog value, plus the first other URL with a
/// query string. When neither exists, the longest URL with a non-empty path
/// is taken instead. If room is left, the first URL containing a catalog
/// value from any other group is added.
pub fn select_revisit_urls<R: Rng + ?Sized>(
    anchors: &[&str],
    catalog: &EncodingCatalog,
    rng: &mut R,
) -> Vec<String> {
    let mut groups = group_by_prefix(anchors.iter().copied());
    if groups.is_empty() {
        return Vec::new();
    }

    let mut primary_idx = 0;
    for (i, group) in groups.iter().enumerate() {
        if group.urls.len() > groups[primary_idx].urls.len() {
            primary_idx = i;
        }
    }

    let primary = &mut groups[primary_idx].urls;
    primary.shuffle(rng);

    let mut selected: Vec<String> = Vec::with_capacity(MAX_REVISIT_URLS);
    if let Some(pos) = primary.iter().position(|url| matches_any(url, catalog)) {
        selected.push(primary.remove(pos));
    }
    if let Some(url) = primary.iter().find(|url| url.contains('?')) {
        selected.push(url.clone());
    }
    if selected.is_empty()
        && let Some(url) = longest_with_path(primary)
    {
        selected.push(url.clone());
    }
    if selected.len() >= MAX_REVISIT_URLS {
        return selected;
    }

    let other = groups
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != primary_idx)
        .find_map(|(_, g)| g.urls.iter().find(|url| matches_any(url, catalog)));
    if let Some(url) = other {
        selected.push(url.clone());
    }

    selected
}

fn longest_with_path(urls: &[String]) -> Option<&String> {
    let mut longest: Option<&String> = None;
    for url in urls {
        let start = url.find("://").map(|i| i + 3).unwrap_or(0);
        let Some(slash) = url[start..].find('/').map(|j| start + j) else {
            continue;
        };
        if slash == url.len() - 1 {
            continue;
        }
        if longest.is_none_or(|l| url.len() > l.len()) {
            longest = Some(url);
        }
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_query_boundary_moves_to_previous_slash() {
        let groups = group_by_prefix(["http://a.com/x?y=1", "http://a.com/x?z=2"]);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].prefix, "http://a.com/");
        assert_eq!(groups[0].urls.len(), 2);
    }

    #[test]
    fn test_query_after_slash_keeps_question_mark() {
        assert_eq!(prefix_key("http://a.com/p/?id=3"), "http://a.com/p/?");
    }

    #[test]
    fn test_query_without_previous_slash_uses_whole_prefix() {
        assert_eq!(prefix_key("abc?x=1"), "abc?");
    }

    #[test]
    fn test_no_query_uses_second_path_separator() {
        assert_eq!(prefix_key("https://shop.com/deals/shoes"), "https://shop.com/deals/");
        assert_eq!(prefix_key("https://shop.com/deals"), "https://shop.com/deals");
        assert_eq!(prefix_key("https://shop.com"), "https://shop.com");
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let groups = group_by_prefix([
            "https://b.com/1/x",
            "https://a.com/1/x",
            "https://b.com/1/y",
        ]);

        let prefixes: Vec<&str> = groups.iter().map(|g| g.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["https://b.com/1/", "https://a.com/1/"]);
    }

    #[test]
    fn test_prefers_encoding_match_in_primary_group() {
        let catalog = EncodingCatalog::for_address("a@b.com");
        let md5 = catalog.get("md5").unwrap().value.clone();
        let hit = format!("https://shop.com/p/track?u={md5}");
        let anchors = vec![
            "https://shop.com/p/one?x=1",
            hit.as_str(),
            "https://shop.com/p/two?x=2",
            "https://other.com/help",
        ];

        let urls = select_revisit_urls(&anchors, &catalog, &mut rng());
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0], hit);
        assert!(urls[1] == "https://shop.com/p/one?x=1" || urls[1] == "https://shop.com/p/two?x=2");
    }

    #[test]
    fn test_encoding_match_alone_skips_longest_path() {
        let catalog = EncodingCatalog::for_address("a@b.com");
        let md5 = catalog.get("md5").unwrap().value.clone();
        let hit = format!("https://shop.com/p/{md5}");
        let anchors = vec!["https://shop.com/p/a-much-longer-path-here", hit.as_str()];

        let urls = select_revisit_urls(&anchors, &catalog, &mut rng());
        assert_eq!(urls, vec![hit.clone()]);
    }

    #[test]
    fn test_full_primary_leaves_no_room_for_other_group() {
        let catalog = EncodingCatalog::for_address("a@b.com");
        let md5 = catalog.get("md5").unwrap().value.clone();
        let hit = format!("https://shop.com/p/track?u={md5}");
        let other = format!("https://ads.net/c/{md5}");
        let anchors = vec![hit.as_str(), "https://shop.com/p/one?x=1", other.as_str()];

        let urls = select_revisit_urls(&anchors, &catalog, &mut rng());
        assert_eq!(urls, vec![hit.clone(), "https://shop.com/p/one?x=1".to_string()]);
    }

    #[test]
    fn test_non_ascii_before_query() {
        assert_eq!(prefix_key("http://a.com/café?x=1"), "http://a.com/");
        assert_eq!(prefix_key("http://a.com/é?x=1"), "http://a.com/");
        assert_eq!(prefix_key("é?x"), "é?");

        let catalog = EncodingCatalog::for_address("a@b.com");
        let urls = select_revisit_urls(&["http://a.com/café?x=1"], &catalog, &mut rng());
        assert_eq!(urls, vec!["http://a.com/café?x=1".to_string()]);
    }

    #[test]
    fn test_falls_back_to_query_url() {
        let catalog = EncodingCatalog::for_address("a@b.com");
        let anchors = vec![
            "https://shop.com/p/one",
            "https://shop.com/p/two?ref=mail",
            "https://shop.com/p/three",
        ];

        let urls = select_revisit_urls(&anchors, &catalog, &mut rng());
        assert_eq!(urls, vec!["https://shop.com/p/two?ref=mail".to_string()]);
    }

    #[test]
    fn test_falls_back_to_longest_path() {
        let catalog = EncodingCatalog::for_address("a@b.com");
        let anchors = vec![
            "https://shop.com/p/a",
            "https://shop.com/p/longest-one",
            "https://shop.com/p/bb",
        ];

        let urls = select_revisit_urls(&anchors, &catalog, &mut rng());
        assert_eq!(urls, vec!["https://shop.com/p/longest-one".to_string()]);
    }

    #[test]
    fn test_root_urls_have_no_path() {
        let catalog = EncodingCatalog::for_address("a@b.com");
        let anchors = vec!["https://shop.com/", "https://shop.com"];

        assert!(select_revisit_urls(&anchors, &catalog, &mut rng()).is_empty());
    }

    #[test]
    fn test_adds_encoding_match_from_other_group() {
        let catalog = EncodingCatalog::for_address("a@b.com");
        let sha1 = catalog.get("sha1").unwrap().value.clone();
        let other = format!("https://ads.net/c/{sha1}");
        let anchors = vec![
            "https://shop.com/p/a",
            "https://shop.com/p/b?x=1",
            other.as_str(),
        ];

        let urls = select_revisit_urls(&anchors, &catalog, &mut rng());
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0], "https://shop.com/p/b?x=1");
        assert_eq!(urls[1], other);
    }

    #[test]
    fn test_tie_goes_to_first_largest_group() {
        let catalog = EncodingCatalog::for_address("a@b.com");
        let anchors = vec!["https://one.com/a/x", "https://two.com/b/y"];

        let urls = select_revisit_urls(&anchors, &catalog, &mut rng());
        assert_eq!(urls, vec!["https://one.com/a/x".to_string()]);
    }

    #[test]
    fn test_empty_input() {
        let catalog = EncodingCatalog::for_address("a@b.com");
        assert!(select_revisit_urls(&[], &catalog, &mut rng()).is_empty());
    }
}
