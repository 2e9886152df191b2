//! Fetching upstream pages and extracting version tokens

use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::library::Library;

/// Name of the capture group holding the version token
pub const VERSION_GROUP: &str = "Version";

/// Trait for resolving the current upstream version of a library
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait VersionSource: Send + Sync {
    /// Fetches `library.url` and extracts the version with `library.regex`
    ///
    /// # Returns
    /// * `Ok(String)` - The non-empty token captured by the `Version` group
    /// * `Err(FetchError)` - If the fetch fails or the pattern yields nothing
    async fn fetch_version(&self, library: &Library) -> Result<String, FetchError>;
}

/// Version source issuing one plain GET per library
pub struct HttpVersionSource {
    client: reqwest::Client,
}

impl HttpVersionSource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("verdog/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl VersionSource for HttpVersionSource {
    async fn fetch_version(&self, library: &Library) -> Result<String, FetchError> {
        let response = self.client.get(&library.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} returned status {}", library.url, status);
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: library.url.clone(),
            });
        }

        let body = response.text().await?;
        debug!("Fetched {} bytes for {}", body.len(), library.name);

        extract_version(&library.regex, &body)
    }
}

/// Applies `pattern` to `body` and returns what the `Version` group captured.
///
/// An empty capture counts as no match, so it can never be recorded as a version.
pub fn extract_version(pattern: &str, body: &str) -> Result<String, FetchError> {
    let regex = Regex::new(pattern)?;

    if !regex.capture_names().any(|name| name == Some(VERSION_GROUP)) {
        return Err(FetchError::MissingGroup);
    }

    regex
        .captures(body)
        .and_then(|caps| caps.name(VERSION_GROUP))
        .map(|m| m.as_str())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(FetchError::NoMatch)
}
