//! Authenticated request dispatcher for the Jamf Pro and Classic APIs.
//!
//! `JamfClient` owns one blocking `reqwest` client (and therefore one
//! connection pool) plus the `TokenProvider` for its server. Every call
//! goes through [`JamfClient::send`]:
//!
//! 1. Make sure a non-expired bearer token is cached, fetching one if not.
//! 2. Join the relative path onto the base URL.
//! 3. Attach `Authorization`, `Accept` and (with a body) `Content-Type`
//!    headers for the family's wire format, JSON for Pro and XML for Classic.
//! 4. Decode a 2xx body into a `serde_json::Value`; turn anything else into
//!    `JamfError::Api` with the status and raw body.
//!
//! One-shot 401 retry: if a data endpoint answers `401 Unauthorized` (the
//! token was revoked, or the server clock disagrees with ours about the
//! expiry), the cached token is dropped, a new one is fetched, and the
//! request is sent exactly once more. A second 401 is returned to the
//! caller as an `Api` error.

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{TOKEN_PATH, TokenProvider};
use crate::config::ClientConfig;
use crate::error::{JamfError, Result};
use crate::request::{ApiFamily, ApiRequest, HttpMethod};

/// Synchronous client for one Jamf Pro server.
///
/// All request methods take `&mut self`: a request may refresh the cached
/// token in place. To issue requests from several threads, build one
/// client per thread or put a client behind a lock.
pub struct JamfClient {
    client: Client,
    base_url: Url,
    auth: TokenProvider,
}

impl JamfClient {
    /// Creates a client for `base_url` (e.g. `https://example.jamfcloud.com`)
    /// with default transport settings. No request is made until the first
    /// call.
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self> {
        Self::with_config(ClientConfig::new(base_url, username, password))
    }

    /// Creates a client from explicit settings.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = config.build_http_client()?;
        let token_url = base_url.join(TOKEN_PATH)?;
        let auth = TokenProvider::new(
            client.clone(),
            token_url,
            &config.username,
            &config.password,
        );
        Ok(JamfClient {
            client,
            base_url,
            auth,
        })
    }

    /// The normalized base URL (always ends in `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Read access to the token cache.
    pub fn auth(&self) -> &TokenProvider {
        &self.auth
    }

    /// Mutable access to the token cache, e.g. to seed or drop a token.
    pub fn auth_mut(&mut self) -> &mut TokenProvider {
        &mut self.auth
    }

    /// Returns a valid bearer token, refreshing if none is cached or the
    /// cached one has expired.
    pub fn ensure_valid_token(&mut self) -> Result<String> {
        self.auth.ensure_valid_token().map(str::to_owned)
    }

    /// Drops the cached token and fetches a new one.
    fn force_refresh(&mut self) -> Result<String> {
        self.auth.invalidate();
        self.ensure_valid_token()
    }

    /// Resolves a relative endpoint path against the base URL.
    ///
    /// A leading `/` is ignored, so `"/api/v1/buildings"` and
    /// `"api/v1/buildings"` address the same endpoint even when the server
    /// lives under a sub-path.
    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Generic escape hatch for any endpoint without a named wrapper.
    ///
    /// `body` is encoded as JSON for [`ApiFamily::Pro`] and as XML for
    /// [`ApiFamily::Classic`]; Classic bodies must therefore be a
    /// single-rooted object such as `{"computer": {...}}`.
    ///
    /// # Errors
    ///
    /// - `JamfError::Authentication` — the token could not be obtained.
    /// - `JamfError::Api` — the endpoint returned a non-2xx status.
    /// - `JamfError::Connection` — transport-level failure.
    /// - `JamfError::Json` / `JamfError::Xml` — a 2xx body did not decode,
    ///   or the request body could not be encoded.
    pub fn make_api_request(
        &mut self,
        path: &str,
        method: HttpMethod,
        family: ApiFamily,
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut request = ApiRequest::new(method, path, family);
        request.body = body;
        self.send(&request)
    }

    /// Sends a prebuilt request descriptor. See [`make_api_request`](Self::make_api_request).
    pub fn send(&mut self, request: &ApiRequest<'_>) -> Result<Value> {
        let content_type = request.content_type();
        let url = self.endpoint_url(request.path)?;
        // Encoded once so the 401 retry resends identical bytes.
        let payload = request
            .body
            .map(|body| content_type.encode(body))
            .transpose()?;

        let token = self.ensure_valid_token()?;
        let mut response = self.dispatch(request, &url, &token, payload.as_deref())?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(method = %request.method, %url, "token rejected, re-authenticating once");
            let fresh_token = self.force_refresh()?;
            response = self.dispatch(request, &url, &fresh_token, payload.as_deref())?;
        }

        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            warn!(method = %request.method, %url, %status, "API request failed");
            return Err(JamfError::Api { status, body: text });
        }

        content_type.decode(&text)
    }

    /// Builds and sends one HTTP request; no status handling.
    fn dispatch(
        &self,
        request: &ApiRequest<'_>,
        url: &Url,
        token: &str,
        payload: Option<&str>,
    ) -> Result<Response> {
        let mime = request.content_type().mime();
        debug!(method = %request.method, %url, family = ?request.family, "sending request");

        let mut builder = self
            .client
            .request(request.method.into(), url.clone())
            .bearer_auth(token)
            .header(ACCEPT, mime);
        if let Some(payload) = payload {
            builder = builder.header(CONTENT_TYPE, mime).body(payload.to_owned());
        }

        let response = builder.send()?;
        debug!(status = %response.status(), "received response");
        Ok(response)
    }

    /// Sends a GET request and decodes the response.
    pub fn get(&mut self, path: &str, family: ApiFamily) -> Result<Value> {
        self.make_api_request(path, HttpMethod::Get, family, None)
    }

    /// Sends a POST request with `body` and decodes the response.
    pub fn post(&mut self, path: &str, family: ApiFamily, body: &Value) -> Result<Value> {
        self.make_api_request(path, HttpMethod::Post, family, Some(body))
    }

    /// Sends a PUT request with `body` and decodes the response.
    pub fn put(&mut self, path: &str, family: ApiFamily, body: &Value) -> Result<Value> {
        self.make_api_request(path, HttpMethod::Put, family, Some(body))
    }

    /// Sends a DELETE request and decodes the response (usually `null`).
    pub fn delete(&mut self, path: &str, family: ApiFamily) -> Result<Value> {
        self.make_api_request(path, HttpMethod::Delete, family, None)
    }

    /// Creates a record and returns its new ID.
    ///
    /// Classic endpoints answer with `<resource><id>N</id></resource>`; Pro
    /// endpoints answer with `{"id": "N", "href": ...}`. Either way the ID
    /// is returned as a string.
    ///
    /// # Errors
    ///
    /// Same as [`make_api_request`](Self::make_api_request), plus
    /// `JamfError::UnexpectedResponse` when the response carries no ID.
    pub fn create_record(&mut self, path: &str, family: ApiFamily, body: &Value) -> Result<String> {
        let response = self.post(path, family, body)?;
        let id = match family {
            ApiFamily::Classic => response
                .as_object()
                .and_then(|root| root.values().next())
                .and_then(|resource| resource.get("id")),
            ApiFamily::Pro => response.get("id"),
        };
        match id {
            Some(Value::String(id)) => Ok(id.clone()),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => Err(JamfError::UnexpectedResponse(format!(
                "create response from {path} has no id: {response}"
            ))),
        }
    }
}

/// Parses the base URL, making sure it ends in `/` so that joins append
/// to it instead of replacing its last segment.
fn parse_base_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim_end_matches('/');
    Ok(Url::parse(&format!("{trimmed}/"))?)
}
