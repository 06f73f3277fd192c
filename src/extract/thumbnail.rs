use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::MIN_FAVICON_PX;
use crate::document::{resolve, DocumentQuery, LinkElement, MetaAttr};

static SIZE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(\d+)x(\d+)$").unwrap());

const TOUCH_ICON_RELS: [&str; 2] = ["apple-touch-icon", "apple-touch-icon-precomposed"];

/// Walk the thumbnail chain and return the first entry that resolves:
/// `og:image`, `twitter:image`, `image_src`, the largest Apple touch icon,
/// then a favicon that is at least 32×32 (or declares no size).
pub fn pick_thumbnail<D: DocumentQuery + ?Sized>(doc: &D) -> Option<String> {
    let og = doc.meta(MetaAttr::Property, "og:image");
    let twitter = doc
        .meta(MetaAttr::Name, "twitter:image")
        .or_else(|| doc.meta(MetaAttr::Property, "twitter:image"));

    for raw in [og, twitter].into_iter().flatten() {
        if let Some(url) = resolve(doc, &raw) {
            return Some(url);
        }
    }

    if let Some(url) = doc
        .links("image_src")
        .iter()
        .find_map(|link| resolve(doc, &link.href))
    {
        return Some(url);
    }

    let touch_icons: Vec<LinkElement> = TOUCH_ICON_RELS
        .iter()
        .flat_map(|rel| doc.links(rel))
        .collect();
    if let Some(url) = largest_resolving(doc, touch_icons) {
        return Some(url);
    }

    let favicons: Vec<LinkElement> = doc
        .links("icon")
        .into_iter()
        .filter(|link| favicon_is_large_enough(declared_size(link.sizes.as_deref())))
        .collect();
    largest_resolving(doc, favicons)
}

/// Largest `WxH` entry of a `sizes` attribute; `None` when nothing usable
/// is declared (missing attribute, `any`, garbage).
pub fn declared_size(sizes: Option<&str>) -> Option<(u32, u32)> {
    sizes?
        .split_ascii_whitespace()
        .filter_map(|token| {
            let caps = SIZE_RE.captures(token)?;
            let w = caps[1].parse::<u32>().ok()?;
            let h = caps[2].parse::<u32>().ok()?;
            Some((w, h))
        })
        .max_by_key(|&(w, h)| u64::from(w) * u64::from(h))
}

fn favicon_is_large_enough(size: Option<(u32, u32)>) -> bool {
    match size {
        None => true,
        Some((w, h)) => w >= MIN_FAVICON_PX && h >= MIN_FAVICON_PX,
    }
}

/// Biggest declared icon first; undeclared sizes rank last, ties keep
/// document order.
fn largest_resolving<D: DocumentQuery + ?Sized>(
    doc: &D,
    mut links: Vec<LinkElement>,
) -> Option<String> {
    links.sort_by_key(|link| {
        let area = declared_size(link.sizes.as_deref())
            .map(|(w, h)| u64::from(w) * u64::from(h))
            .unwrap_or(0);
        std::cmp::Reverse(area)
    });
    links.iter().find_map(|link| resolve(doc, &link.href))
}
