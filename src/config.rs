//! Client configuration
//!
//! Fixed when the [`DataClient`](crate::DataClient) is constructed and never
//! mutated afterwards.

use std::time::Duration;

/// Default upstream API root
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Default resource path under the API root
pub const DEFAULT_RESOURCE: &str = "pokemon";

/// Default per-attempt timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default number of items per list page
pub const DEFAULT_PAGE_SIZE: u32 = 36;

/// Default number of retries after the initial attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default linear backoff step in milliseconds
pub const DEFAULT_BACKOFF_STEP_MS: u64 = 1_000;

/// Settings for the data client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Resource collection under the API root
    pub resource: String,
    /// Timeout applied to every physical attempt
    pub timeout: Duration,
    /// Page size used when the caller does not pass a limit
    pub page_size: u32,
    /// Retries after the initial attempt (total attempts = max_retries + 1)
    pub max_retries: u32,
    /// Backoff unit; the delay before retry `n` (0-based) is `backoff_step * (n + 1)`
    pub backoff_step: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            resource: DEFAULT_RESOURCE.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            page_size: DEFAULT_PAGE_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_step: Duration::from_millis(DEFAULT_BACKOFF_STEP_MS),
        }
    }
}

impl ClientConfig {
    /// Override the API root. A trailing slash is stripped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff_step(mut self, backoff_step: Duration) -> Self {
        self.backoff_step = backoff_step;
        self
    }

    /// Delay inserted before retrying after the given 0-based attempt
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt.saturating_add(1))
    }

    /// URL of one list page
    pub fn list_url(&self, offset: u32, limit: u32) -> String {
        format!(
            "{}/{}?offset={}&limit={}",
            self.base_url, self.resource, offset, limit
        )
    }

    /// URL of a single item's detail document
    pub fn details_url(&self, id_or_name: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.resource, id_or_name)
    }
}
