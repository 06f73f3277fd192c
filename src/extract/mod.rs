mod thumbnail;

pub use thumbnail::{declared_size, pick_thumbnail};

use crate::config::MIN_DESCRIPTION_CHARS;
use crate::document::{resolve, DocumentQuery, MetaAttr};
use crate::models::{Candidate, MetadataRecord};

// ── Provenance labels ──────────────────────────────────────────────────────

pub const SOURCE_LOCATION: &str = "current URL";
pub const SOURCE_CANONICAL: &str = "canonical link";
pub const SOURCE_OG_URL: &str = "og:url";
pub const SOURCE_DOCUMENT_TITLE: &str = "document title";
pub const SOURCE_OG_TITLE: &str = "og:title";

// ── Extraction ─────────────────────────────────────────────────────────────

/// Read every metadata field `doc` exposes.
///
/// URL and title keep all their raw candidates in priority order (relative
/// URLs already resolved); the remaining fields are reduced to the first
/// acceptable entry of their fallback chain. Nothing here fails: a missing
/// element just leaves its slot empty.
pub fn extract_metadata<D: DocumentQuery + ?Sized>(doc: &D) -> MetadataRecord {
    let record = MetadataRecord {
        url: url_candidates(doc),
        title: title_candidates(doc),
        description: pick_description(doc),
        thumbnail: pick_thumbnail(doc),
        author: pick_author(doc),
        site_name: doc.meta(MetaAttr::Property, "og:site_name"),
    };

    tracing::debug!(
        urls = record.url.len(),
        titles = record.title.len(),
        description = record.description.is_some(),
        thumbnail = record.thumbnail.is_some(),
        author = record.author.is_some(),
        "Extracted page metadata"
    );

    record
}

fn url_candidates<D: DocumentQuery + ?Sized>(doc: &D) -> Vec<Candidate> {
    let mut candidates = vec![Candidate::new(doc.location().as_str(), SOURCE_LOCATION)];

    if let Some(url) = doc
        .links("canonical")
        .first()
        .and_then(|link| resolve(doc, &link.href))
    {
        candidates.push(Candidate::new(url, SOURCE_CANONICAL));
    }

    if let Some(url) = doc
        .meta(MetaAttr::Property, "og:url")
        .and_then(|raw| resolve(doc, &raw))
    {
        candidates.push(Candidate::new(url, SOURCE_OG_URL));
    }

    candidates
}

fn title_candidates<D: DocumentQuery + ?Sized>(doc: &D) -> Vec<Candidate> {
    [
        (doc.title(), SOURCE_DOCUMENT_TITLE),
        (doc.meta(MetaAttr::Property, "og:title"), SOURCE_OG_TITLE),
    ]
    .into_iter()
    .filter_map(|(value, label)| value.map(|v| Candidate::new(v, label)))
    .collect()
}

/// `og:description`, then `<meta name="description">`; too-short entries
/// count as missing. Length is measured in UTF-16 code units, the way a
/// browser reports a string's length.
fn pick_description<D: DocumentQuery + ?Sized>(doc: &D) -> Option<String> {
    [
        doc.meta(MetaAttr::Property, "og:description"),
        doc.meta(MetaAttr::Name, "description"),
    ]
    .into_iter()
    .flatten()
    .map(|d| d.trim().to_string())
    .find(|d| d.encode_utf16().count() >= MIN_DESCRIPTION_CHARS)
}

fn pick_author<D: DocumentQuery + ?Sized>(doc: &D) -> Option<String> {
    doc.meta(MetaAttr::Property, "article:author")
        .or_else(|| doc.meta(MetaAttr::Name, "author"))
        .or_else(|| doc.meta(MetaAttr::Name, "twitter:creator"))
        .or_else(|| doc.meta(MetaAttr::Property, "twitter:creator"))
}
