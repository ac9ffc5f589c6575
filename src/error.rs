//! Typed error hierarchy for the jamf-pro crate.
//!
//! Every failure a caller can observe is one of three boundaries:
//! - `Authentication` — the token endpoint rejected the credentials or
//!   returned something that is not a `{token, expires}` document.
//! - `Api` — a data endpoint answered with a non-2xx status. The raw
//!   body is preserved because Jamf puts its diagnostic text there.
//! - `Connection` — the request never produced an HTTP status (DNS, TCP,
//!   TLS, timeout). The `reqwest::Error` is carried unmodified.
//!
//! The remaining variants cover local problems: a 2xx body that does not
//! decode, a base URL that does not parse, or a response missing the
//! element an endpoint wrapper expects.

use reqwest::StatusCode;

use crate::xml::XmlError;

/// Unified error type for all jamf-pro operations.
#[derive(Debug, thiserror::Error)]
pub enum JamfError {
    /// The Jamf token endpoint (`api/v1/auth/token`) refused to issue a
    /// token, or issued a response that could not be parsed.
    ///
    /// Never retried.
    #[error("authentication failed: {message}")]
    Authentication {
        /// Human-readable description, including the HTTP status and the
        /// response body when the server answered.
        message: String,
        /// The underlying parse error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A data endpoint returned a non-success HTTP status code.
    #[error("API error {status}: {body}")]
    Api {
        /// The HTTP status code returned by Jamf.
        status: StatusCode,
        /// The raw response body text. Empty if the body could not be read.
        body: String,
    },

    /// A transport-level failure: DNS resolution, connection refused,
    /// TLS handshake, request timeout. No HTTP status is available.
    #[error("connection error: {0}")]
    Connection(#[from] reqwest::Error),

    /// A Pro API response body with a success status was not valid JSON.
    #[error("failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// A Classic API response body with a success status was not valid
    /// XML, or a request body could not be encoded as XML.
    #[error("failed to process XML: {0}")]
    Xml(#[from] XmlError),

    /// The configured base URL (or a path joined onto it) is not a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The response decoded fine but did not have the shape an endpoint
    /// wrapper expects (e.g. a missing `<computer>` root element).
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, JamfError>;
