//! Bearer-token authentication against the Jamf Pro token endpoint.
//!
//! Jamf issues short-lived bearer tokens from `POST api/v1/auth/token`
//! in exchange for HTTP Basic credentials. The same token authorizes both
//! the Pro and the Classic API. `TokenProvider` caches the token together
//! with the expiry timestamp the server reports, and refreshes it on
//! demand when it is absent or expired.

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::error::{JamfError, Result};

/// Token endpoint, relative to the server base URL.
pub const TOKEN_PATH: &str = "api/v1/auth/token";

/// Body of a successful token response.
///
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiJ9...", "expires": "2024-03-01T18:21:44.417Z" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    /// Opaque bearer token.
    pub token: String,
    /// Server-side expiry of `token`.
    pub expires: DateTime<Utc>,
}

impl TokenResponse {
    /// A token is expired once its expiry is at or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}

/// Manages token acquisition and caching for one Jamf server.
///
/// Invariants:
/// - `cached` is `None` until the first successful refresh (or `set_token`).
/// - `token()` only ever returns a token whose expiry is in the future.
pub struct TokenProvider {
    client: Client,
    token_url: Url,
    username: String,
    password: String,
    cached: Option<TokenResponse>,
}

impl TokenProvider {
    /// Creates a provider with an empty cache. `client` is the transport
    /// shared with the dispatcher.
    pub fn new(client: Client, token_url: Url, username: &str, password: &str) -> Self {
        TokenProvider {
            client,
            token_url,
            username: username.to_string(),
            password: password.to_string(),
            cached: None,
        }
    }

    /// Requests a new token and caches it, replacing any previous one.
    ///
    /// The body is read as text before the status is checked so that
    /// Jamf's error text ends up in the `Authentication` error.
    pub fn refresh_token(&mut self) -> Result<()> {
        debug!(url = %self.token_url, "requesting bearer token");
        let response = self
            .client
            .post(self.token_url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .header(ACCEPT, "application/json")
            .header(
                CONTENT_TYPE,
                "application/x-www-form-urlencoded;charset=UTF-8",
            )
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(JamfError::Authentication {
                message: format!("token request failed ({status}): {body}"),
                source: None,
            });
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| JamfError::Authentication {
                message: "failed to parse token response".to_string(),
                source: Some(Box::new(e)),
            })?;

        info!(expires = %token.expires, "acquired bearer token");
        self.cached = Some(token);
        Ok(())
    }

    /// Returns a usable token, fetching a new one first if none is cached
    /// or the cached one has expired.
    pub fn ensure_valid_token(&mut self) -> Result<&str> {
        if self.token().is_none() {
            self.refresh_token()?;
        }
        self.token().ok_or_else(|| JamfError::Authentication {
            message: "server issued a token that is already expired".to_string(),
            source: None,
        })
    }

    /// Drops the cached token so the next request re-authenticates.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Returns `true` if a token exists but its expiry has passed.
    /// Returns `false` if no token is cached.
    pub fn is_expired(&self) -> bool {
        self.cached
            .as_ref()
            .is_some_and(|cached| cached.is_expired_at(Utc::now()))
    }

    /// The cached token, or `None` if there is none or it has expired.
    pub fn token(&self) -> Option<&str> {
        self.cached
            .as_ref()
            .filter(|cached| !cached.is_expired_at(Utc::now()))
            .map(|cached| cached.token.as_str())
    }

    /// The cached token response regardless of expiry.
    pub fn cached(&self) -> Option<&TokenResponse> {
        self.cached.as_ref()
    }

    /// Seeds the cache with a token obtained elsewhere.
    pub fn set_token(&mut self, token: &str, expires: DateTime<Utc>) {
        self.cached = Some(TokenResponse {
            token: token.to_string(),
            expires,
        });
    }

    /// Absolute URL of the token endpoint.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn provider() -> TokenProvider {
        TokenProvider::new(
            Client::new(),
            Url::parse("https://example.jamfcloud.com/api/v1/auth/token").unwrap(),
            "api-user",
            "secret",
        )
    }

    #[test]
    fn token_is_none_before_refresh() {
        let tp = provider();
        assert!(tp.token().is_none(), "token must be None before any refresh");
        assert!(!tp.is_expired(), "no token is not the same as expired");
    }

    #[test]
    fn token_response_deserializes_from_jamf_format() {
        let json = r#"{
            "token": "eyJhbGciOiJIUzI1NiJ9.test",
            "expires": "2024-03-01T18:21:44.417Z"
        }"#;
        let resp: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.token, "eyJhbGciOiJIUzI1NiJ9.test");
        assert_eq!(
            resp.expires,
            Utc.with_ymd_and_hms(2024, 3, 1, 18, 21, 44).unwrap() + Duration::milliseconds(417)
        );
    }

    #[test]
    fn token_response_requires_expiry() {
        let resp: std::result::Result<TokenResponse, _> =
            serde_json::from_str(r#"{"token": "abc"}"#);
        assert!(resp.is_err());
    }

    #[test]
    fn fresh_token_is_returned() {
        let mut tp = provider();
        tp.set_token("fresh", Utc::now() + Duration::minutes(20));
        assert_eq!(tp.token(), Some("fresh"));
        assert!(!tp.is_expired());
    }

    #[test]
    fn expired_token_returns_none() {
        let mut tp = provider();
        tp.set_token("stale", Utc::now() - Duration::minutes(1));
        assert!(tp.token().is_none(), "token must be None after expiry");
        assert!(tp.is_expired());
        assert_eq!(tp.cached().map(|c| c.token.as_str()), Some("stale"));
    }

    #[test]
    fn expiry_boundary_counts_as_expired() {
        let now = Utc::now();
        let resp = TokenResponse {
            token: "t".to_string(),
            expires: now,
        };
        assert!(resp.is_expired_at(now));
        assert!(!resp.is_expired_at(now - Duration::seconds(1)));
    }

    #[test]
    fn invalidate_clears_cache() {
        let mut tp = provider();
        tp.set_token("fresh", Utc::now() + Duration::minutes(20));
        tp.invalidate();
        assert!(tp.cached().is_none());
        assert!(tp.token().is_none());
    }
}
