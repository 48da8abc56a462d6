//! Client configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the client can start with zero
//! configuration against a backend on the local machine.

use std::path::PathBuf;
use std::time::Duration;

use bktutor_shared::constants::{
    DEFAULT_PAGE_SIZE, FILTER_DEBOUNCE_MS, LOCAL_API_PORT, PUBLIC_API_PREFIX,
};

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Explicit API base, bypassing host detection.
    /// Env: `BKTUTOR_API_BASE`
    /// Default: none.
    pub api_base_override: Option<String>,

    /// Origin the web pages are served from (`scheme://host[:port]`).
    /// Env: `BKTUTOR_PAGE_ORIGIN`
    /// Default: `http://localhost`
    pub page_origin: String,

    /// Sessions per browse page.
    /// Env: `BKTUTOR_PAGE_SIZE`
    /// Default: `4`
    pub page_size: usize,

    /// Quiet period before a filter change re-fetches the session list.
    /// Env: `BKTUTOR_DEBOUNCE_MS`
    /// Default: `250`
    pub debounce: Duration,

    /// Directory holding the local download-log database.
    /// Env: `BKTUTOR_DATA_DIR`
    /// Default: the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_override: None,
            page_origin: "http://localhost".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            debounce: Duration::from_millis(FILTER_DEBOUNCE_MS),
            data_dir: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(base) = lookup("BKTUTOR_API_BASE") {
            if !base.trim().is_empty() {
                config.api_base_override = Some(base.trim().to_string());
            }
        }

        if let Some(origin) = lookup("BKTUTOR_PAGE_ORIGIN") {
            if split_origin(&origin).is_some() {
                config.page_origin = origin.trim().trim_end_matches('/').to_string();
            } else {
                tracing::warn!(value = %origin, "Invalid BKTUTOR_PAGE_ORIGIN, using default");
            }
        }

        if let Some(val) = lookup("BKTUTOR_PAGE_SIZE") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.page_size = n,
                _ => tracing::warn!(value = %val, "Invalid BKTUTOR_PAGE_SIZE, using default"),
            }
        }

        if let Some(val) = lookup("BKTUTOR_DEBOUNCE_MS") {
            match val.parse::<u64>() {
                Ok(ms) => config.debounce = Duration::from_millis(ms),
                Err(_) => tracing::warn!(value = %val, "Invalid BKTUTOR_DEBOUNCE_MS, using default"),
            }
        }

        if let Some(dir) = lookup("BKTUTOR_DATA_DIR") {
            if !dir.is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }

        config
    }

    /// Absolute API base used to build every endpoint url.
    pub fn api_base(&self) -> String {
        let (scheme, host) = split_origin(&self.page_origin)
            .map(|(s, h, _)| (s.to_string(), h.to_string()))
            .unwrap_or_else(|| ("http".to_string(), "localhost".to_string()));
        let base = resolve_api_base(self.api_base_override.as_deref(), &scheme, &host);
        if base.starts_with('/') {
            format!("{}{}", self.page_origin.trim_end_matches('/'), base)
        } else {
            base
        }
    }
}

/// Pick the API base for a page served from `scheme://host`.
///
/// Pages on a local network host talk to the gateway directly on port 4000;
/// everything else goes through the reverse proxy under `/api`, which is
/// returned relative to the page origin.
pub fn resolve_api_base(override_base: Option<&str>, scheme: &str, host: &str) -> String {
    if let Some(base) = override_base {
        return base.trim_end_matches('/').to_string();
    }
    if is_local_host(host) {
        format!("{scheme}://{host}:{LOCAL_API_PORT}")
    } else {
        PUBLIC_API_PREFIX.to_string()
    }
}

fn is_local_host(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "0.0.0.0")
        || host.starts_with("192.168.")
        || host.starts_with("172.")
}

/// Split `scheme://host[:port][/]` into its parts.
fn split_origin(origin: &str) -> Option<(&str, &str, Option<u16>)> {
    let (scheme, rest) = origin.trim().split_once("://")?;
    let authority = rest.trim_end_matches('/');
    if scheme.is_empty() || authority.is_empty() || authority.contains('/') {
        return None;
    }
    match authority.rsplit_once(':') {
        Some((host, port)) => Some((scheme, host, Some(port.parse().ok()?))),
        None => Some((scheme, authority, None)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.page_size, 4);
        assert_eq!(config.debounce, Duration::from_millis(250));
        assert_eq!(config.api_base(), "http://localhost:4000");
    }

    #[test]
    fn test_local_hosts_use_gateway_port() {
        assert_eq!(resolve_api_base(None, "http", "127.0.0.1"), "http://127.0.0.1:4000");
        assert_eq!(resolve_api_base(None, "http", "192.168.1.20"), "http://192.168.1.20:4000");
        assert_eq!(resolve_api_base(None, "https", "172.20.95.15"), "https://172.20.95.15:4000");
    }

    #[test]
    fn test_public_host_uses_proxy_prefix() {
        assert_eq!(resolve_api_base(None, "https", "tutor.hcmut.edu.vn"), "/api");

        let config = ClientConfig::from_lookup(lookup_from(&[(
            "BKTUTOR_PAGE_ORIGIN",
            "https://tutor.hcmut.edu.vn/",
        )]));
        assert_eq!(config.api_base(), "https://tutor.hcmut.edu.vn/api");
    }

    #[test]
    fn test_override_wins() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("BKTUTOR_API_BASE", "http://10.0.0.5:9000/"),
            ("BKTUTOR_PAGE_ORIGIN", "http://localhost:5173"),
        ]));
        assert_eq!(config.api_base(), "http://10.0.0.5:9000");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("BKTUTOR_PAGE_SIZE", "0"),
            ("BKTUTOR_DEBOUNCE_MS", "soon"),
            ("BKTUTOR_PAGE_ORIGIN", "localhost"),
        ]));
        assert_eq!(config.page_size, 4);
        assert_eq!(config.debounce, Duration::from_millis(250));
        assert_eq!(config.page_origin, "http://localhost");
    }

    #[test]
    fn test_split_origin() {
        assert_eq!(split_origin("http://localhost:5173"), Some(("http", "localhost", Some(5173))));
        assert_eq!(split_origin("https://example.org"), Some(("https", "example.org", None)));
        assert_eq!(split_origin("example.org"), None);
        assert_eq!(split_origin("http://host/path"), None);
    }
}
