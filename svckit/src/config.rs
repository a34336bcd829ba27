// svckit/src/config.rs
//
// Client configuration: where the feedback backend lives

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default backend address, matching the service's development port.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Hard cap on the number of feedback records fetched for the detailed view.
pub const FEEDBACK_PAGE_LIMIT: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            // Submissions wait on server-side classification, which is slow.
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Root of the REST API, e.g. `http://localhost:8001/api`.
    pub fn api_root(&self) -> String {
        format!("{}/api", self.base_url.trim_end_matches('/'))
    }
}
