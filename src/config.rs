//! Runtime Configuration
//!
//! Resolved once at start-up from the page host and compile-time overrides.

/// Production backend, used when no override is compiled in
pub const PRODUCTION_BASE: &str = "https://tidytasks-80b95fdaeb61.herokuapp.com";
/// Local backend origin during development
pub const LOCAL_BASE: &str = "http://localhost:3001";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Prefix for every REST endpoint
    pub api_base_url: String,
    /// Origin serving `/api/auth/google`
    pub google_auth_base: String,
    /// Where `<view>.html` fragments are served from
    pub views_path: String,
    /// Append a timestamp query to fragment requests
    pub cache_bust: bool,
    pub poll_interval_ms: u32,
    pub toast_duration_ms: u32,
}

impl AppConfig {
    /// Build the configuration for a given page hostname
    pub fn for_host(hostname: &str) -> Self {
        let local = is_local_host(hostname);
        let api_base_url = match option_env!("TIDYTASKS_API_URL") {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ if local => format!("{}/api", LOCAL_BASE),
            _ => PRODUCTION_BASE.to_string(),
        };
        let google_auth_base = if local { LOCAL_BASE } else { PRODUCTION_BASE }.to_string();

        Self {
            api_base_url,
            google_auth_base,
            views_path: "/views".to_string(),
            cache_bust: cfg!(debug_assertions),
            poll_interval_ms: 30_000,
            toast_duration_ms: 5_000,
        }
    }

    /// Configuration for the current page
    pub fn from_window() -> Self {
        let hostname = web_sys::window()
            .and_then(|w| w.location().hostname().ok())
            .unwrap_or_default();
        Self::for_host(&hostname)
    }

    pub fn google_auth_url(&self) -> String {
        format!("{}/api/auth/google", self.google_auth_base)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}

fn is_local_host(hostname: &str) -> bool {
    matches!(hostname, "localhost" | "127.0.0.1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_host_uses_local_backend() {
        if option_env!("TIDYTASKS_API_URL").is_some() {
            return;
        }
        let config = AppConfig::for_host("localhost");
        assert_eq!(config.api_base_url, "http://localhost:3001/api");
        assert_eq!(config.google_auth_url(), "http://localhost:3001/api/auth/google");
        assert_eq!(config.endpoint("/tasks"), "http://localhost:3001/api/tasks");
    }

    #[test]
    fn test_remote_host_uses_production() {
        let config = AppConfig::for_host("tidytasks.example.org");
        assert_eq!(config.google_auth_base, PRODUCTION_BASE);
        assert_eq!(config.views_path, "/views");
        assert_eq!(config.poll_interval_ms, 30_000);
    }
}
