use url::Url;

use crate::config::is_tracking_param;

/// Canonicalize `raw` and strip tracking parameters.
///
/// Removes the `utm_*` family and the named click identifiers, keeps every
/// other query pair in its original order and encoding, and drops a
/// trailing empty fragment (`#`). Input that does not parse as an absolute
/// URL is returned unchanged.
pub fn normalize(raw: &str) -> String {
    let mut url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(error = %e, url = %raw, "Cannot parse URL, leaving it as-is");
            return raw.to_string();
        }
    };

    if let Some(query) = url.query() {
        let kept: Vec<&str> = query
            .split('&')
            .filter(|pair| !pair.is_empty() && !is_tracking_param(&param_name(pair)))
            .collect();
        let kept = kept.join("&");
        url.set_query(if kept.is_empty() { None } else { Some(&kept) });
    }

    if url.fragment() == Some("") {
        url.set_fragment(None);
    }

    url.to_string()
}

/// Decoded name of a raw `name=value` query pair.
fn param_name(pair: &str) -> String {
    let name = pair.split('=').next().unwrap_or(pair);
    url::form_urlencoded::parse(name.as_bytes())
        .next()
        .map(|(k, _)| k.into_owned())
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_utm_and_keeps_others() {
        assert_eq!(
            normalize("https://a.com/p?x=1&utm_source=foo"),
            "https://a.com/p?x=1"
        );
    }

    #[test]
    fn strips_every_named_click_id() {
        let url = "https://a.com/p?fbclid=1&a=2&gclid=3&msclkid=4&mc_cid=5&mc_eid=6&b=7";
        assert_eq!(normalize(url), "https://a.com/p?a=2&b=7");
    }

    #[test]
    fn drops_query_entirely_when_only_tracking() {
        assert_eq!(
            normalize("https://a.com/p?utm_medium=email&utm_campaign=x"),
            "https://a.com/p"
        );
    }

    #[test]
    fn keeps_param_encoding_and_order() {
        assert_eq!(
            normalize("https://a.com/s?q=a+b&utm_term=z&lang=pt%2DPT"),
            "https://a.com/s?q=a+b&lang=pt%2DPT"
        );
    }

    #[test]
    fn encoded_tracking_name_is_still_recognised() {
        assert_eq!(
            normalize("https://a.com/p?utm%5Fsource=x&k=v"),
            "https://a.com/p?k=v"
        );
    }

    #[test]
    fn strips_empty_fragment() {
        assert_eq!(normalize("https://a.com/p#"), "https://a.com/p");
    }

    #[test]
    fn keeps_non_empty_fragment() {
        assert_eq!(normalize("https://a.com/p#sec"), "https://a.com/p#sec");
        assert_eq!(
            normalize("https://a.com/p?utm_source=x#sec"),
            "https://a.com/p#sec"
        );
    }

    #[test]
    fn malformed_input_is_returned_unchanged() {
        assert_eq!(normalize("not a url"), "not a url");
        assert_eq!(normalize("/relative/path?utm_source=x"), "/relative/path?utm_source=x");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn is_idempotent() {
        let inputs = [
            "https://a.com/p?x=1&utm_source=foo",
            "https://A.com/p?&&x=1&&fbclid=zz#",
            "https://a.com/p#sec",
            "https://a.com",
            "https://a.com/?",
            "mailto:someone@example.com?utm_source=x",
            "not a url",
            "http://[::1",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input}");
        }
    }
}
