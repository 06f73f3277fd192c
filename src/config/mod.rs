use std::env;

// ── Build-time behaviour constants ─────────────────────────────────────────

/// Descriptions shorter than this (UTF-16 code units, after trimming) are noise.
pub const MIN_DESCRIPTION_CHARS: usize = 12;

/// Favicons must declare at least this many pixels on both sides, or no size.
pub const MIN_FAVICON_PX: u32 = 32;

/// Query parameters starting with this prefix are always stripped.
pub const TRACKING_PARAM_PREFIX: &str = "utm_";

/// Exact tracking parameter names stripped from every URL candidate.
pub const TRACKING_PARAMS: &[&str] = &[
    "fbclid", "gclid", "gclsrc", "dclid", "msclkid", "mc_cid", "mc_eid", "yclid", "igshid",
    "_hsenc", "_hsmi", "mkt_tok",
];

// ── Runtime environment ────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Config {
    /// `APP_ENV=production` switches log output to JSON.
    pub is_production: bool,
    /// `NO_COLOR` (any value) disables coloured notices.
    pub no_color: bool,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Config {
            is_production: env::var("APP_ENV").as_deref() == Ok("production"),
            no_color: env::var_os("NO_COLOR").is_some(),
            log_filter: env::var("RUST_LOG").unwrap_or_else(|_| "pagelink=info".to_string()),
        }
    }
}

pub fn is_tracking_param(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.starts_with(TRACKING_PARAM_PREFIX) || TRACKING_PARAMS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utm_family_is_tracking() {
        assert!(is_tracking_param("utm_source"));
        assert!(is_tracking_param("utm_campaign"));
        assert!(is_tracking_param("UTM_Medium"));
    }

    #[test]
    fn named_click_ids_are_tracking() {
        for name in ["fbclid", "gclid", "msclkid", "mc_cid", "mc_eid"] {
            assert!(is_tracking_param(name), "{name} should be stripped");
        }
    }

    #[test]
    fn ordinary_params_are_kept() {
        assert!(!is_tracking_param("x"));
        assert!(!is_tracking_param("page"));
        assert!(!is_tracking_param("utm"));
    }
}
