//! Blocking Rust client for the Jamf Pro device-management API.
//!
//! Covers both API families served by a Jamf Pro server: the JSON "Pro"
//! API under `api/` and the XML "Classic" API under `JSSResource/`. Both
//! are authorized with the same bearer token, which the client obtains
//! from the server with Basic credentials and refreshes once it expires.
//!
//! # Modules
//!
//! - [`auth`] — bearer token acquisition and expiry tracking.
//! - [`client`] — the authenticated request dispatcher, `JamfClient`.
//! - [`config`] — connection settings.
//! - [`error`] — typed error hierarchy (`JamfError`).
//! - [`request`] — request descriptors: method, API family, wire format.
//! - [`xml`] — XML ⇄ `serde_json::Value` codec for the Classic API.
//! - [`classic`] — named Classic API endpoints.
//! - [`pro`] — named Pro API endpoints.
//!
//! # Quick Start
//!
//! ```no_run
//! use jamf_pro::client::JamfClient;
//! use jamf_pro::request::{ApiFamily, HttpMethod};
//! use jamf_pro::{classic, pro};
//!
//! # fn main() -> jamf_pro::error::Result<()> {
//! let mut client = JamfClient::new("https://example.jamfcloud.com", "api-user", "secret")?;
//!
//! let devices = pro::mobile_devices(&mut client)?;
//! println!("{} mobile devices", devices.total_count);
//!
//! let computer = classic::computer(&mut client, 42)?;
//! println!("{}", computer["general"]["name"]);
//!
//! // Any endpoint without a named wrapper:
//! let _buildings = client.make_api_request("api/v1/buildings", HttpMethod::Get, ApiFamily::Pro, None)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod auth;
pub mod classic;
pub mod client;
pub mod config;
pub mod error;
pub mod pro;
pub mod request;
pub mod xml;
