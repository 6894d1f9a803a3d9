//! Client configuration.

use std::time::Duration;

use crate::error::ConfigError;

pub const ENV_API_URL: &str = "STOCKMESH_API_URL";
pub const ENV_REFRESH_SECS: &str = "STOCKMESH_REFRESH_SECS";
pub const ENV_NOTICE_SECS: &str = "STOCKMESH_NOTICE_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "STOCKMESH_REQUEST_TIMEOUT_SECS";

/// API root that selects the in-process gateway instead of HTTP.
pub const IN_MEMORY_API_ROOT: &str = "memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL that `/inventory` paths are appended to (no trailing slash).
    pub api_root: String,
    /// Period of the silent background refresh.
    pub refresh_interval: Duration,
    /// How long a notice stays up before the adapter dismisses it.
    pub notice_ttl: Duration,
    /// Transport-level request timeout. `None` leaves it to the HTTP stack.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_root: "http://localhost:8080/api".to_string(),
            refresh_interval: Duration::from_secs(30),
            notice_ttl: Duration::from_secs(5),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = ttl;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.api_root == IN_MEMORY_API_ROOT
    }

    /// Load from the process environment; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            if url.trim().is_empty() {
                return Err(ConfigError::Empty { var: ENV_API_URL });
            }
            config = config.with_api_root(url.trim());
        }
        if let Some(secs) = seconds(&lookup, ENV_REFRESH_SECS)? {
            config.refresh_interval = secs;
        }
        if let Some(secs) = seconds(&lookup, ENV_NOTICE_SECS)? {
            config.notice_ttl = secs;
        }
        if let Some(secs) = seconds(&lookup, ENV_REQUEST_TIMEOUT_SECS)? {
            config.request_timeout = Some(secs);
        }

        Ok(config)
    }
}

fn seconds<F>(lookup: &F, var: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(Duration::from_secs(n))),
        _ => Err(ConfigError::InvalidSeconds { var, value: raw }),
    }
}
