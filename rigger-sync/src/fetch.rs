//! Best-effort remote fetch with bundled fallback.

use std::time::Duration;

use rigger_templates::{ResourceError, Resources};

use crate::error::FetchError;

/// Fixed request timeout. There is no retry.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of remote text.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("rigger/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.agent.get(url).call().map_err(Box::new)?;
        Ok(response.into_string()?)
    }
}

/// Fetcher that never touches the network (`--offline`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

impl Fetch for OfflineFetcher {
    fn fetch(&self, _url: &str) -> Result<String, FetchError> {
        Err(FetchError::Offline)
    }
}

/// Fetch `url`, or return the bundled resource `fallback` on any failure.
///
/// The fetch error is logged and dropped; only a missing fallback resource
/// is reported.
pub fn fetch_or_fallback(
    fetcher: &dyn Fetch,
    url: &str,
    resources: &Resources,
    fallback: &str,
) -> Result<String, ResourceError> {
    match fetcher.fetch(url) {
        Ok(body) => Ok(body),
        Err(error) => {
            tracing::warn!(url, %error, fallback, "fetch failed, using bundled copy");
            Ok(resources.raw(fallback)?.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
