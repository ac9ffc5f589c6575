//! Client construction settings.
//!
//! Everything is passed in explicitly; nothing is read from files or the
//! environment.

use std::fmt;
use std::time::Duration;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("jamf-pro/", env!("CARGO_PKG_VERSION"));

/// Connection settings for a [`JamfClient`](crate::client::JamfClient).
#[derive(Clone)]
pub struct ClientConfig {
    /// Server root, e.g. `https://example.jamfcloud.com`.
    pub base_url: String,
    /// Jamf Pro account name.
    pub username: String,
    /// Jamf Pro account password.
    pub password: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Overall per-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Settings with the default user agent and transport timeout.
    pub fn new(base_url: &str, username: &str, password: &str) -> Self {
        ClientConfig {
            base_url: base_url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }

    /// Sets an overall per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Builds the blocking transport shared by the dispatcher and the
    /// token provider.
    pub(crate) fn build_http_client(&self) -> crate::error::Result<reqwest::blocking::Client> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

// The password must not end up in logs via `{:?}`.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}
