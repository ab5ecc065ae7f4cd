//! Client configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{ForgeError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_MS: u64 = 120_000;

const ENV_URL: &str = "FORGE_URL";
const ENV_TIMEOUT: &str = "FORGE_TIMEOUT_SECS";

/// Where the Forge server lives and how long a request may take.
///
/// The timeout bounds the whole exchange, connection setup included.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Request timeout, at millisecond resolution.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Read `FORGE_URL` and `FORGE_TIMEOUT_SECS` (fractional seconds allowed),
    /// falling back to defaults for whichever is unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_URL) {
            config.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            let timeout = raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .ok_or_else(|| {
                    ForgeError::Config(format!("{ENV_TIMEOUT} is not a non-negative number: {raw:?}"))
                })?;
            config = config.with_timeout(timeout);
        }
        Ok(config)
    }
}
