//! Best-effort HTTP fetching.
//!
//! Every fetch resolves to a [`FetchRecord`]; network failures, timeouts
//! and non-2xx statuses all degrade to an absent body instead of an
//! error. Downstream rules pattern-match on the record.

use std::time::Duration;
use tracing::debug;

/// Options for the shared HTTP client.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// User-agent header sent with every request.
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 15,
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

impl From<&crate::config::FetchConfig> for FetchOptions {
    fn from(config: &crate::config::FetchConfig) -> Self {
        Self {
            timeout_seconds: config.timeout_seconds,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Outcome of a single resource fetch.
///
/// `body` is `Some` only when the request completed with a 2xx status
/// and readable text. `status` is 0 when no response was received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchRecord {
    pub body: Option<String>,
    pub status: u16,
    pub final_url: String,
}

impl FetchRecord {
    /// Record for a resource that could not be fetched.
    pub fn absent(url: &str) -> Self {
        Self {
            body: None,
            status: 0,
            final_url: url.to_string(),
        }
    }

    /// The body, when the resource was reachable.
    pub fn present(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.body.is_some()
    }
}

/// HTTP fetcher shared by one audit run.
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Create a fetcher with the given options.
    ///
    /// Redirects are followed (reqwest default) and the timeout applies
    /// independently to each request.
    pub fn new(options: &FetchOptions) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .user_agent(options.user_agent.clone())
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch a text resource. Never fails; see [`FetchRecord`].
    pub async fn fetch_text(&self, url: &str) -> FetchRecord {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Fetch failed for {}: {}", url, e);
                return FetchRecord::absent(url);
            }
        };

        let status = response.status();
        let final_url = response.url().to_string();

        let body = if status.is_success() {
            match response.text().await {
                Ok(text) => Some(text),
                Err(e) => {
                    debug!("Body read failed for {}: {}", url, e);
                    None
                }
            }
        } else {
            debug!("Non-success status {} for {}", status, url);
            None
        };

        FetchRecord {
            body,
            status: status.as_u16(),
            final_url,
        }
    }

    /// Probe a resource, true when it answers with a success status.
    pub async fn fetch_ok(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Probe failed for {}: {}", url, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_record() {
        let record = FetchRecord::absent("https://example.com/robots.txt");
        assert_eq!(record.status, 0);
        assert_eq!(record.present(), None);
        assert!(!record.is_present());
        assert_eq!(record.final_url, "https://example.com/robots.txt");
    }

    #[test]
    fn test_present_record() {
        let record = FetchRecord {
            body: Some("User-agent: *".to_string()),
            status: 200,
            final_url: "https://example.com/robots.txt".to_string(),
        };
        assert_eq!(record.present(), Some("User-agent: *"));
        assert!(record.is_present());
    }

    #[test]
    fn test_default_options() {
        let options = FetchOptions::default();
        assert_eq!(options.timeout_seconds, 15);
        assert_eq!(options.user_agent, "Mozilla/5.0");
    }
}
