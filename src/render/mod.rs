use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::models::{MetadataRecord, RichSnippet};

/// Author values with one of these prefixes are rendered as links.
const URL_PREFIXES: [&str; 3] = ["http://", "https://", "//"];

pub fn is_url_like(value: &str) -> bool {
    URL_PREFIXES.iter().any(|p| value.starts_with(p))
}

/// Build the pasteable snippet for `url`.
///
/// HTML order is fixed: title link, author, description, thumbnail. Each
/// optional line is emitted on its own; a missing one never affects the
/// others. Every page-supplied value is escaped. Without a title the URL
/// doubles as the link text.
pub fn render(url: &str, metadata: &MetadataRecord) -> RichSnippet {
    let title = metadata.first_title().unwrap_or(url);

    let mut html = format!(
        r#"<a href="{}">{}</a>"#,
        encode_double_quoted_attribute(url),
        encode_text(title)
    );
    let mut text = format!("{title}\n{url}");

    if let Some(author) = metadata.author.as_deref() {
        let shown = if is_url_like(author) {
            format!(
                r#"<a href="{}">{}</a>"#,
                encode_double_quoted_attribute(author),
                encode_text(author)
            )
        } else {
            encode_text(author).into_owned()
        };
        html.push_str(&format!("<br/><small>by {shown}</small>"));
        text.push_str(&format!("\nby {author}"));
    }

    if let Some(description) = metadata.description.as_deref() {
        html.push_str(&format!("<br/><small>{}</small>", encode_text(description)));
        text.push_str(&format!("\n{description}"));
    }

    if let Some(thumbnail) = metadata.thumbnail.as_deref() {
        html.push_str(&format!(
            r#"<br/><img data-editor-shrink="true" src="{}"/>"#,
            encode_double_quoted_attribute(thumbnail)
        ));
    }

    RichSnippet { html, text }
}
