use std::env;
use std::path::PathBuf;

use log::warn;

pub const DEFAULT_SITE_URL: &str = "https://www.englishcalculators.com";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_OUT_DIR: &str = "dist";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Absolute base URL without a trailing slash.
    pub site_url: String,
    pub port: u16,
    pub out_dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            port: DEFAULT_PORT,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

/// Flag values given on the command line; `None` means not given.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub site_url: Option<String>,
    pub port: Option<u16>,
    pub out_dir: Option<PathBuf>,
}

impl SiteConfig {
    pub fn from_env(overrides: Overrides) -> Self {
        Self::resolve(overrides, |key| env::var(key).ok())
    }

    /// Flags win over `SITE_URL`, which wins over `VITE_SITE_URL` and `PORT`,
    /// which win over the defaults.
    pub fn resolve(overrides: Overrides, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let site_url = overrides
            .site_url
            .or_else(|| lookup("SITE_URL"))
            .or_else(|| lookup("VITE_SITE_URL"));

        let port = overrides.port.unwrap_or_else(|| match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("PORT={raw:?} is not a valid port, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        });

        Self {
            site_url: normalize_site_url(site_url.as_deref()),
            port,
            out_dir: overrides
                .out_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
        }
    }
}

/// Trims, falls back to the default when empty, and drops one trailing `/`.
pub fn normalize_site_url(value: Option<&str>) -> String {
    let trimmed = value.map(str::trim).unwrap_or_default();
    let cleaned = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if cleaned.is_empty() {
        DEFAULT_SITE_URL.to_string()
    } else {
        cleaned.to_string()
    }
}
