//! Selection of images worth fetching as outbound probes.

use rand::Rng;

use super::encoding::EncodingCatalog;
use super::extractor::ExtractedContent;
use super::scanner::matches_any;

/// Why an image was selected for probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeReason {
    /// Inline image declared as 1x1.
    TrackingPixel,
    /// Image URL contains an encoding of the recipient address.
    EncodingMatch,
    /// One random unremarkable image, fetched for comparison.
    ControlSample,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCandidate {
    pub url: String,
    pub reason: ProbeReason,
}

/// Picks the image URLs of a message to probe.
///
/// 1x1 inline images are always selected. Any other inline or CSS image
/// whose URL contains a catalog value is selected too. From the images left
/// over, one is drawn uniformly at random as a control sample. Each URL
/// appears at most once in the result.
pub fn select_probes<R: Rng + ?Sized>(
    content: &ExtractedContent,
    catalog: &EncodingCatalog,
    rng: &mut R,
) -> Vec<ProbeCandidate> {
    let mut selected: Vec<ProbeCandidate> = Vec::new();
    let mut unselected: Vec<&str> = Vec::new();

    let add = |selected: &mut Vec<ProbeCandidate>, url: &str, reason: ProbeReason| {
        if !selected.iter().any(|c| c.url == url) {
            selected.push(ProbeCandidate {
                url: url.to_string(),
                reason,
            });
        }
    };

    for image in &content.inline_images {
        if image.is_one_by_one() {
            add(&mut selected, &image.url, ProbeReason::TrackingPixel);
        } else if matches_any(&image.url, catalog) {
            add(&mut selected, &image.url, ProbeReason::EncodingMatch);
        } else {
            unselected.push(&image.url);
        }
    }

    for image in &content.css_images {
        if matches_any(&image.url, catalog) {
            add(&mut selected, &image.url, ProbeReason::EncodingMatch);
        } else {
            unselected.push(&image.url);
        }
    }

    // The same URL may appear both as a pixel and as a plain image.
    unselected.retain(|url| !selected.iter().any(|c| c.url == *url));

    if !unselected.is_empty() {
        let pick = unselected[rng.random_range(0..unselected.len())];
        add(&mut selected, pick, ProbeReason::ControlSample);
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::detection::extractor::extract;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_pixels_always_selected() {
        let catalog = EncodingCatalog::for_address("a@b.com");
        let content = extract(
            r#"<img src="http://t1.example/p.gif" width="1" height="1">
               <img src="http://t2.example/p.gif" width="1" height="1">"#,
        );

        let selected = select_probes(&content, &catalog, &mut rng());
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|c| c.reason == ProbeReason::TrackingPixel));
    }

    #[test]
    fn test_pixel_with_encoding_counts_as_pixel() {
        let catalog = EncodingCatalog::for_address("a@b.com");
        let md5 = &catalog.get("md5").unwrap().value;
        let html = format!(r#"<img src="http://t.example/p.gif?u={md5}" width="1" height="1">"#);

        let selected = select_probes(&extract(&html), &catalog, &mut rng());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].reason, ProbeReason::TrackingPixel);
    }

    #[test]
    fn test_encoding_matches_in_inline_and_css_images() {
        let catalog = EncodingCatalog::for_address("a@b.com");
        let sha = &catalog.get("sha256").unwrap().value;
        let html = format!(
            r#"<style>.x {{ background: url(http://css.example/{sha}.png) }}</style>
               <img src="http://img.example/o.png?e=a%40b.com" width="600">"#
        );

        let selected = select_probes(&extract(&html), &catalog, &mut rng());
        let matched: Vec<&str> = selected
            .iter()
            .filter(|c| c.reason == ProbeReason::EncodingMatch)
            .map(|c| c.url.as_str())
            .collect();
        assert_eq!(matched.len(), 2);
        assert!(!selected.iter().any(|c| c.reason == ProbeReason::ControlSample));
    }

    #[test]
    fn test_exactly_one_control_sample() {
        let catalog = EncodingCatalog::for_address("a@b.com");
        let content = extract(
            r#"<img src="http://a.example/1.png"><img src="http://a.example/2.png">
               <img src="http://a.example/3.png">"#,
        );

        let selected = select_probes(&content, &catalog, &mut rng());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].reason, ProbeReason::ControlSample);
        assert!(selected[0].url.starts_with("http://a.example/"));
    }

    #[test]
    fn test_control_sample_is_reproducible_with_seed() {
        let catalog = EncodingCatalog::for_address("a@b.com");
        let content = extract(
            r#"<img src="http://a.example/1.png"><img src="http://a.example/2.png">
               <img src="http://a.example/3.png"><img src="http://a.example/4.png">"#,
        );

        let first = select_probes(&content, &catalog, &mut rng());
        let second = select_probes(&content, &catalog, &mut rng());
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_images_selects_nothing() {
        let catalog = EncodingCatalog::for_address("a@b.com");
        let content = extract(r#"<p>hello</p><a href="http://a.example/">link</a>"#);

        assert!(select_probes(&content, &catalog, &mut rng()).is_empty());
    }
}
