//! Option catalogue configuration.
//!
//! Controls where the filter's school, department and program lists come
//! from, how long a fetch may take, and whether the built-in fallback
//! catalogue may stand in for a failed fetch.
//!
//! # Configuration
//!
//! - `REGISTRAR_OPTION_SOURCE`: `http` (registrar backend) or `static` (built-in catalogue)
//! - `REGISTRAR_API_BASE_URL`: Backend base URL (default: `http://localhost:8080/api`)
//! - `REGISTRAR_LOAD_MODE`: `eager` or `lazy` (default: `eager`)
//! - `REGISTRAR_FETCH_TIMEOUT_MS`: Per-fetch timeout in milliseconds (default: 10000)
//! - `REGISTRAR_PAGE_SIZE`: Page size requested from the backend (default: 1000)
//! - `REGISTRAR_ALLOW_MOCK_FALLBACK`: Serve fallback data on fetch failure (default: false)

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use registrar_models::LoadMode;

use crate::env_or;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OptionSourceKind {
    #[default]
    Http,
    Static,
}

impl FromStr for OptionSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(OptionSourceKind::Http),
            "static" => Ok(OptionSourceKind::Static),
            other => Err(format!("unknown option source '{other}'")),
        }
    }
}

impl fmt::Display for OptionSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSourceKind::Http => f.write_str("http"),
            OptionSourceKind::Static => f.write_str("static"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Where option lists are loaded from.
    pub source: OptionSourceKind,

    /// Base URL of the registrar backend, without a trailing slash.
    pub base_url: String,

    /// Default load mode for new filter stores.
    pub load_mode: LoadMode,

    /// Upper bound on a single provider call.
    pub fetch_timeout: Duration,

    /// Number of rows requested per list endpoint.
    pub page_size: u32,

    /// Substitute the built-in catalogue when a fetch fails.
    ///
    /// Responses served this way are tagged as fallback data.
    pub allow_mock_fallback: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: OptionSourceKind::Http,
            base_url: "http://localhost:8080/api".to_string(),
            load_mode: LoadMode::Eager,
            fetch_timeout: Duration::from_millis(10_000),
            page_size: 1000,
            allow_mock_fallback: false,
        }
    }
}

impl CatalogConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = std::env::var("REGISTRAR_API_BASE_URL").unwrap_or(defaults.base_url);

        Self {
            source: env_or("REGISTRAR_OPTION_SOURCE", defaults.source),
            base_url: base_url.trim_end_matches('/').to_string(),
            load_mode: env_or("REGISTRAR_LOAD_MODE", defaults.load_mode),
            fetch_timeout: Duration::from_millis(env_or(
                "REGISTRAR_FETCH_TIMEOUT_MS",
                defaults.fetch_timeout.as_millis() as u64,
            )),
            page_size: env_or("REGISTRAR_PAGE_SIZE", defaults.page_size).max(1),
            allow_mock_fallback: std::env::var("REGISTRAR_ALLOW_MOCK_FALLBACK")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.allow_mock_fallback),
        }
    }

    /// Static catalogue with fallback enabled, for offline development.
    pub fn offline() -> Self {
        Self {
            source: OptionSourceKind::Static,
            allow_mock_fallback: true,
            ..Self::default()
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.source, OptionSourceKind::Http);
        assert_eq!(config.load_mode, LoadMode::Eager);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert!(!config.allow_mock_fallback);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_source_kind_parse() {
        assert_eq!("static".parse::<OptionSourceKind>(), Ok(OptionSourceKind::Static));
        assert_eq!("HTTP".parse::<OptionSourceKind>(), Ok(OptionSourceKind::Http));
        assert!("ftp".parse::<OptionSourceKind>().is_err());
    }

    #[test]
    fn test_offline_profile() {
        let config = CatalogConfig::offline();
        assert_eq!(config.source, OptionSourceKind::Static);
        assert!(config.allow_mock_fallback);
    }
}
