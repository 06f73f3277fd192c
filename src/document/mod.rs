use scraper::{Html, Selector};
use url::Url;

/// Which attribute names a `<meta>` element: `property="og:title"` or
/// `name="description"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaAttr {
    Property,
    Name,
}

impl MetaAttr {
    fn attr_name(self) -> &'static str {
        match self {
            MetaAttr::Property => "property",
            MetaAttr::Name => "name",
        }
    }
}

/// A `<link>` element as seen by the extractor. `href` is the raw attribute
/// value, not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkElement {
    pub href: String,
    pub sizes: Option<String>,
}

impl LinkElement {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            sizes: None,
        }
    }

    pub fn with_sizes(mut self, sizes: impl Into<String>) -> Self {
        self.sizes = Some(sizes.into());
        self
    }
}

/// Read-only view of an already-loaded page.
///
/// Every lookup answers "absent" rather than failing, so the extractor can
/// be driven by a parsed HTML page or by a hand-built document in tests.
pub trait DocumentQuery {
    /// Where the page was loaded from.
    fn location(&self) -> &Url;

    /// What relative references resolve against.
    fn base_url(&self) -> &Url {
        self.location()
    }

    /// The document title with whitespace collapsed, if non-empty.
    fn title(&self) -> Option<String>;

    /// Trimmed, non-empty `content` of the first matching `<meta>` element.
    fn meta(&self, attr: MetaAttr, key: &str) -> Option<String>;

    /// Every `<link>` whose `rel` token list contains `rel`, in document order.
    fn links(&self, rel: &str) -> Vec<LinkElement>;
}

/// Resolve a raw attribute value against the document's base URL.
/// Only `http` and `https` results are kept; anything else (`javascript:`,
/// `data:`, `file:`) must never reach a link or image in the snippet.
pub fn resolve<D: DocumentQuery + ?Sized>(doc: &D, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match doc.base_url().join(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url.to_string()),
        Ok(url) => {
            tracing::debug!(scheme = url.scheme(), "Dropping non-web reference");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, value = %raw, "Dropping unresolvable reference");
            None
        }
    }
}

// ── Parsed HTML ────────────────────────────────────────────────────────────

/// A parsed HTML page together with the location it was loaded from.
pub struct HtmlDocument {
    html: Html,
    location: Url,
    base: Url,
}

impl HtmlDocument {
    pub fn parse(source: &str, location: Url) -> Self {
        let html = Html::parse_document(source);
        let base = get_base_href(&html)
            .and_then(|href| location.join(&href).ok())
            .unwrap_or_else(|| location.clone());

        Self {
            html,
            location,
            base,
        }
    }
}

impl DocumentQuery for HtmlDocument {
    fn location(&self) -> &Url {
        &self.location
    }

    fn base_url(&self) -> &Url {
        &self.base
    }

    fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|s| !s.is_empty())
    }

    fn meta(&self, attr: MetaAttr, key: &str) -> Option<String> {
        let selector = Selector::parse("meta[content]").ok()?;
        self.html
            .select(&selector)
            .filter(|el| {
                el.value()
                    .attr(attr.attr_name())
                    .is_some_and(|v| v.trim().eq_ignore_ascii_case(key))
            })
            .filter_map(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty())
    }

    fn links(&self, rel: &str) -> Vec<LinkElement> {
        let Ok(selector) = Selector::parse("link[rel][href]") else {
            return Vec::new();
        };
        self.html
            .select(&selector)
            .filter(|el| {
                el.value()
                    .attr("rel")
                    .is_some_and(|r| r.split_ascii_whitespace().any(|t| t.eq_ignore_ascii_case(rel)))
            })
            .filter_map(|el| {
                let href = el.value().attr("href")?.trim();
                if href.is_empty() {
                    return None;
                }
                Some(LinkElement {
                    href: href.to_string(),
                    sizes: el.value().attr("sizes").map(|s| s.trim().to_string()),
                })
            })
            .collect()
    }
}

fn get_base_href(doc: &Html) -> Option<String> {
    let selector = Selector::parse("base[href]").ok()?;
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}
