//! Request descriptor types for the dispatcher.
//!
//! An [`ApiRequest`] names the verb, the relative path, which API family
//! the path belongs to, and an optional body. The family decides the wire
//! format: the Pro API speaks JSON, the Classic API speaks XML.

use std::fmt;

use serde_json::Value;

use crate::error::Result;
use crate::xml;

/// HTTP verbs the Jamf APIs use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Read a resource.
    Get,
    /// Create a resource.
    Post,
    /// Replace or update a resource.
    Put,
    /// Remove a resource.
    Delete,
}

impl HttpMethod {
    /// Upper-case method name as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// The two API families served under one Jamf Pro base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFamily {
    /// Legacy API under `JSSResource/`, XML bodies.
    Classic,
    /// Modern API under `api/`, JSON bodies.
    Pro,
}

impl ApiFamily {
    /// Wire format used for both request and response bodies.
    pub fn content_type(self) -> ContentType {
        match self {
            ApiFamily::Classic => ContentType::Xml,
            ApiFamily::Pro => ContentType::Json,
        }
    }
}

/// Body encoding for a request/response pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// `application/json`
    Json,
    /// `application/xml`
    Xml,
}

impl ContentType {
    /// MIME type used for the `Accept` and `Content-Type` headers.
    pub fn mime(self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::Xml => "application/xml",
        }
    }

    /// Serializes a request body.
    ///
    /// XML bodies must be a single-rooted object (`{"computer": {...}}`).
    pub fn encode(self, body: &Value) -> Result<String> {
        match self {
            ContentType::Json => Ok(serde_json::to_string(body)?),
            ContentType::Xml => Ok(xml::to_xml(body)?),
        }
    }

    /// Deserializes a success response body. An empty (or whitespace-only)
    /// body decodes to `null`: Jamf answers some DELETE and PUT calls
    /// with no content.
    pub fn decode(self, text: &str) -> Result<Value> {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        match self {
            ContentType::Json => Ok(serde_json::from_str(text)?),
            ContentType::Xml => Ok(xml::from_xml(text)?),
        }
    }
}

/// A single call to a Jamf endpoint, built per request and consumed by
/// [`JamfClient::send`](crate::client::JamfClient::send).
#[derive(Debug, Clone)]
pub struct ApiRequest<'a> {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Path relative to the server base URL, e.g. `JSSResource/computers`.
    pub path: &'a str,
    /// Which API the path belongs to.
    pub family: ApiFamily,
    /// Optional payload, encoded per [`ApiFamily::content_type`].
    pub body: Option<&'a Value>,
}

impl<'a> ApiRequest<'a> {
    /// A bodiless request.
    pub fn new(method: HttpMethod, path: &'a str, family: ApiFamily) -> Self {
        ApiRequest {
            method,
            path,
            family,
            body: None,
        }
    }

    /// Attaches a payload.
    pub fn with_body(mut self, body: &'a Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Shorthand for `self.family.content_type()`.
    pub fn content_type(&self) -> ContentType {
        self.family.content_type()
    }
}
