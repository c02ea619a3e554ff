use crate::error::{ApiError, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.sistrix.com";

/// The API only tolerates a slow, steady request rate.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(1500);

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings shared by every request
#[derive(Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: Url,
    pub request_delay: Duration,
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            request_delay: DEFAULT_REQUEST_DELAY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        self.base_url = parsed;
        Ok(self)
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Full URL for an API method, e.g. `https://api.sistrix.com/optimizer.ranking`
    pub fn endpoint_url(&self, method: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(method);
        }
        url
    }
}

// Hand-written so the key never ends up in logs through `{:?}`
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"[hidden]")
            .field("base_url", &self.base_url.as_str())
            .field("request_delay", &self.request_delay)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_default_base() {
        let config = ApiConfig::new("key");
        assert_eq!(
            config.endpoint_url("optimizer.projects").as_str(),
            "https://api.sistrix.com/optimizer.projects"
        );
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let config = ApiConfig::new("key")
            .with_base_url("http://127.0.0.1:8080/proxy/")
            .unwrap();
        assert_eq!(
            config.endpoint_url("optimizer.ranking").as_str(),
            "http://127.0.0.1:8080/proxy/optimizer.ranking"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ApiConfig::new("key").with_base_url("not a url");
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));

        let result = ApiConfig::new("key").with_base_url("mailto:seo@example.com");
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = ApiConfig::new("super-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[hidden]"));
    }
}
