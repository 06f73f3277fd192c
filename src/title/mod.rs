/// Separator placed between the site name and the page title.
pub const SITE_SEPARATOR: &str = " — ";

/// Prefix `title` with `site_name` unless the title already mentions it.
///
/// The check is a case-insensitive substring match on the trimmed site
/// name, so applying this twice with the same site name changes nothing.
pub fn compose(title: &str, site_name: Option<&str>) -> String {
    let site = match site_name.map(str::trim) {
        Some(site) if !site.is_empty() => site,
        _ => return title.to_string(),
    };

    if title.to_lowercase().contains(&site.to_lowercase()) {
        return title.to_string();
    }

    format!("{site}{SITE_SEPARATOR}{title}")
}
