//! Link extraction from HTML message bodies.
//!
//! Parsing never touches the network. Malformed markup degrades to whatever
//! the HTML5 parser recovers, so extraction itself cannot fail.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::entities::LeakSource;

static SRC: LazyLock<Selector> = LazyLock::new(|| selector("[src]"));
static LINK_HREF: LazyLock<Selector> = LazyLock::new(|| selector("link[href]"));
static ANCHOR_HREF: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static STYLE: LazyLock<Selector> = LazyLock::new(|| selector("style"));
static BASE_HREF: LazyLock<Selector> = LazyLock::new(|| selector("base[href]"));

static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*['"]?([^'"\)]*)['"]?\s*\)"#).expect("valid css url regex")
});

fn selector(s: &str) -> Selector {
    Selector::parse(s).expect("valid static selector")
}

/// Classification of an extracted reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Image,
    Media,
    Import,
    Anchor,
}

impl LinkKind {
    /// Leak source recorded when a link of this kind contains an encoding.
    pub fn leak_source(&self) -> LeakSource {
        match self {
            LinkKind::Image => LeakSource::Image,
            LinkKind::Media => LeakSource::Media,
            LinkKind::Import => LeakSource::Import,
            LinkKind::Anchor => LeakSource::Link,
        }
    }
}

/// An absolute http(s) reference found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    pub url: String,
    pub kind: LinkKind,
    /// Rendered text, anchors only.
    pub text: Option<String>,
    /// Raw trimmed attribute text, inline images only.
    pub width: Option<String>,
    pub height: Option<String>,
}

impl ExtractedLink {
    fn new(url: String, kind: LinkKind) -> Self {
        Self {
            url,
            kind,
            text: None,
            width: None,
            height: None,
        }
    }

    /// True for a classic 1x1 tracking pixel.
    pub fn is_one_by_one(&self) -> bool {
        self.width.as_deref() == Some("1") && self.height.as_deref() == Some("1")
    }
}

/// Everything extracted from one HTML body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Every link in extraction order: sources, imports, anchors, CSS images.
    pub links: Vec<ExtractedLink>,
    /// `img` elements with a source.
    pub inline_images: Vec<ExtractedLink>,
    /// `url()` references inside `style` blocks.
    pub css_images: Vec<ExtractedLink>,
    /// Other elements with a source attribute.
    pub media: Vec<ExtractedLink>,
    pub imports: Vec<ExtractedLink>,
    pub anchors: Vec<ExtractedLink>,
    /// Whitespace-collapsed document text.
    pub text: String,
}

impl ExtractedContent {
    /// Inline and CSS images together.
    pub fn images(&self) -> impl Iterator<Item = &ExtractedLink> {
        self.inline_images.iter().chain(self.css_images.iter())
    }

    fn push(&mut self, link: ExtractedLink, inline_css: bool) {
        let bucket = match (link.kind, inline_css) {
            (LinkKind::Image, true) => &mut self.css_images,
            (LinkKind::Image, false) => &mut self.inline_images,
            (LinkKind::Media, _) => &mut self.media,
            (LinkKind::Import, _) => &mut self.imports,
            (LinkKind::Anchor, _) => &mut self.anchors,
        };
        bucket.push(link.clone());
        self.links.push(link);
    }
}

/// Parses `html` and classifies every absolute http(s) reference.
///
/// `img` sources become [`LinkKind::Image`] with their width and height
/// attributes; other source attributes become [`LinkKind::Media`]. Relative
/// references are resolved against the document's `<base href>` and dropped
/// when there is none.
pub fn extract(html: &str) -> ExtractedContent {
    let document = Html::parse_document(html);
    let base = document
        .select(&BASE_HREF)
        .next()
        .and_then(|e| e.value().attr("href"))
        .and_then(|href| Url::parse(href.trim()).ok());

    let mut content = ExtractedContent::default();

    for element in document.select(&SRC) {
        let Some(url) = absolute_url(element.value().attr("src"), base.as_ref()) else {
            continue;
        };
        if element.value().name() == "img" {
            let mut link = ExtractedLink::new(url, LinkKind::Image);
            link.width = attr_trimmed(&element, "width");
            link.height = attr_trimmed(&element, "height");
            content.push(link, false);
        } else {
            content.push(ExtractedLink::new(url, LinkKind::Media), false);
        }
    }

    for element in document.select(&LINK_HREF) {
        if let Some(url) = absolute_url(element.value().attr("href"), base.as_ref()) {
            content.push(ExtractedLink::new(url, LinkKind::Import), false);
        }
    }

    for element in document.select(&ANCHOR_HREF) {
        if let Some(url) = absolute_url(element.value().attr("href"), base.as_ref()) {
            let mut link = ExtractedLink::new(url, LinkKind::Anchor);
            link.text = Some(collapse_whitespace(element.text()));
            content.push(link, false);
        }
    }

    for element in document.select(&STYLE) {
        let css: String = element.text().collect();
        for url in extract_css_urls(&css) {
            content.push(ExtractedLink::new(url, LinkKind::Image), true);
        }
    }

    content.text = document_text(&document);
    content
}

/// Rendered text of the document, leaving out `style` and `script` contents.
fn document_text(document: &Html) -> String {
    let visible = document.root_element().descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| matches!(e.name(), "style" | "script"))
        });
        (!hidden).then_some(&**text)
    });
    collapse_whitespace(visible)
}

/// Finds absolute http(s) `url(...)` references in a stylesheet, skipping `data:` URIs.
pub fn extract_css_urls(css: &str) -> Vec<String> {
    CSS_URL
        .captures_iter(css)
        .filter_map(|caps| {
            let url = caps.get(1)?.as_str().trim();
            if url.len() >= 5 && url[..5].eq_ignore_ascii_case("data:") {
                return None;
            }
            is_http_url(url).then(|| url.to_string())
        })
        .collect()
}

fn absolute_url(raw: Option<&str>, base: Option<&Url>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https").then(|| url.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let joined = base?.join(raw).ok()?;
            matches!(joined.scheme(), "http" | "https").then(|| joined.to_string())
        }
        Err(_) => None,
    }
}

fn is_http_url(s: &str) -> bool {
    Url::parse(s)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn attr_trimmed(element: &ElementRef<'_>, name: &str) -> Option<String> {
    element.value().attr(name).map(|v| v.trim().to_string())
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let joined: String = parts.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}
