use std::time::Duration;

use serde::{Deserialize, Serialize};
use trendstitch_core::BackoffConfig;
use url::Url;

/// How requests to the vendor are authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Auth {
    /// No credentials.
    #[default]
    None,
    /// Static bearer token.
    Bearer {
        /// Token sent as `Authorization: Bearer <token>`.
        token: String,
    },
    /// HTTP basic authentication.
    Basic {
        /// User name.
        username: String,
        /// Password.
        password: String,
    },
    /// Arbitrary header carrying an API key.
    Header {
        /// Header name, e.g. `x-api-key`.
        name: String,
        /// Header value.
        value: String,
    },
    /// OAuth-style client credentials exchanged for an access token before the first request.
    ClientCredentials {
        /// Token endpoint.
        token_url: Url,
        /// Client identifier.
        client_id: String,
        /// Client secret.
        client_secret: String,
    },
}

/// Retry policy for transient upstream failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,
    /// Delay growth between attempts.
    pub backoff: BackoffConfig,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: BackoffConfig::default(),
        }
    }
}

/// Polling cadence for asynchronous report vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Delay between status checks.
    pub interval: Duration,
    /// Give up once the report has not become ready within this long.
    pub max_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_wait: Duration::from_secs(60 * 60),
        }
    }
}

/// Connection settings for one HTTP vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Root every vendor endpoint is resolved against.
    pub base_url: Url,
    /// Credentials applied to every vendor request.
    #[serde(default)]
    pub auth: Auth,
    /// Per-request timeout enforced by the HTTP client.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
    /// `User-Agent` header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Retry policy for transport errors, 429 and 5xx responses.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Status polling for report vendors.
    #[serde(default)]
    pub poll: PollConfig,
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    concat!("trendstitch/", env!("CARGO_PKG_VERSION")).to_string()
}

impl HttpConfig {
    /// Defaults for everything except the base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            auth: Auth::None,
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            retry: RetryConfig::default(),
            poll: PollConfig::default(),
        }
    }

    /// Replace the authentication scheme.
    #[must_use]
    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    /// Replace the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the polling cadence.
    #[must_use]
    pub const fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Replace the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
