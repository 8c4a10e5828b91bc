use std::time::Duration;

/// Base URL used when nothing else is configured, matching the backend's
/// local development address.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

const API_BASE_ENV: &str = "AISSAM_API_BASE";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for an API client instance.
///
/// Constructed explicitly and passed into `ApiClient::new`. There are no
/// process-wide defaults and nothing here mutates after construction; two
/// clients with different configs never observe each other.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend, without a trailing slash
    pub api_base: String,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        let mut api_base = api_base.into();
        while api_base.ends_with('/') {
            api_base.pop();
        }
        ClientConfig {
            api_base,
            user_agent: format!("aissam-client/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read the base URL from `AISSAM_API_BASE`, falling back to the local
    /// development default.
    pub fn from_env() -> Self {
        let api_base = std::env::var(API_BASE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self::new(api_base)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}
