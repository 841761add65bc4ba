// Configuration: where the backend lives, how long we wait for it and the
// client-side upload limits. Values come from the environment (a `.env`
// file is loaded by `main` before this runs) and CLI flags override them.

use log::warn;
use std::time::Duration;

/// Backend URL used when `PDFSIGHT_API_URL` is not set.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";
/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "PDFSIGHT_API_URL";
/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "PDFSIGHT_TIMEOUT_SECS";
/// Scanned PDFs go through OCR on the server, which can take minutes.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Largest upload accepted by the client, in MiB.
pub const MAX_UPLOAD_MB: u64 = 50;
pub const MAX_UPLOAD_BYTES: u64 = MAX_UPLOAD_MB * 1024 * 1024;
/// Accepted filename suffix, compared case-insensitively.
pub const ACCEPTED_EXTENSION: &str = ".pdf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Empty values
    /// are treated as unset; an unparsable timeout falls back to the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config = config.with_api_base(url);
        }
        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(
                    "ignoring {}={:?}, using {}s",
                    TIMEOUT_ENV, raw, DEFAULT_TIMEOUT_SECS
                ),
            }
        }
        config
    }

    pub fn with_api_base(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.api_base = url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL for an endpoint path such as `/analyze`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_localhost_when_unset() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.api_base, "http://localhost:5000");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn reads_url_and_trims_trailing_slash() {
        let config = Config::from_lookup(lookup_from(&[
            (API_URL_ENV, "https://pdf.example.com/api/"),
            (TIMEOUT_ENV, "42"),
        ]));
        assert_eq!(config.api_base, "https://pdf.example.com/api");
        assert_eq!(config.endpoint("/analyze"), "https://pdf.example.com/api/analyze");
        assert_eq!(config.timeout, Duration::from_secs(42));
    }

    #[test]
    fn bad_timeout_and_blank_url_fall_back() {
        let config = Config::from_lookup(lookup_from(&[(API_URL_ENV, "  "), (TIMEOUT_ENV, "soon")]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn upload_limit_is_fifty_mebibytes() {
        assert_eq!(MAX_UPLOAD_BYTES, 52_428_800);
    }
}
