//! Endpoint settings resolved from the environment.

use std::time::Duration;
use tracing::warn;

/// Base path of the analysis API when no override is configured.
pub const DEFAULT_API_BASE: &str = "/api";

/// Origin used to resolve a relative base path.
pub const DEFAULT_API_ORIGIN: &str = "http://127.0.0.1:8000";

/// Bounded wait for one analysis call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub const ENV_API_URL: &str = "WN_API_URL";
pub const ENV_API_ORIGIN: &str = "WN_API_ORIGIN";
pub const ENV_API_TIMEOUT_SECS: &str = "WN_API_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    /// Absolute URL or path relative to `origin`.
    pub base_url: String,
    pub origin: String,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            origin: DEFAULT_API_ORIGIN.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientSettings {
    /// Settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(base) = get(ENV_API_URL) {
            settings.base_url = base;
        }
        if let Some(origin) = get(ENV_API_ORIGIN) {
            settings.origin = origin;
        }
        if let Some(raw) = get(ENV_API_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => settings.timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "ignoring invalid {}", ENV_API_TIMEOUT_SECS),
            }
        }

        settings
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute API root with no trailing slash.
    pub fn api_root(&self) -> String {
        let base = self.base_url.trim();
        if base.starts_with("http://") || base.starts_with("https://") {
            base.trim_end_matches('/').to_string()
        } else {
            let origin = self.origin.trim().trim_end_matches('/');
            let path = base.trim_matches('/');
            if path.is_empty() {
                origin.to_string()
            } else {
                format!("{}/{}", origin, path)
            }
        }
    }

    /// Absolute URL of an endpoint below the API root.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_root(), path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_resolves_relative_api_path() {
        let settings = ClientSettings::default();
        assert_eq!(settings.endpoint("analyze"), "http://127.0.0.1:8000/api/analyze");
        assert_eq!(settings.timeout, Duration::from_secs(120));
    }

    #[test]
    fn absolute_override_wins() {
        let settings =
            ClientSettings::from_lookup(lookup(&[(ENV_API_URL, "https://wn.example.org/v1/")]));
        assert_eq!(settings.endpoint("/analyze"), "https://wn.example.org/v1/analyze");
    }

    #[test]
    fn empty_and_invalid_values_are_ignored() {
        let settings = ClientSettings::from_lookup(lookup(&[
            (ENV_API_URL, ""),
            (ENV_API_TIMEOUT_SECS, "soon"),
            (ENV_API_ORIGIN, "http://localhost:5173/"),
        ]));
        assert_eq!(settings.base_url, DEFAULT_API_BASE);
        assert_eq!(settings.timeout, DEFAULT_TIMEOUT);
        assert_eq!(settings.endpoint("analyze"), "http://localhost:5173/api/analyze");
    }
}
