//! Named wrappers for the Jamf Pro API (`api/...`).
//!
//! | Function | API Path |
//! |----------|----------|
//! | [`computers_inventory`] | GET `api/v1/computers-inventory` |
//! | [`mobile_device`] | GET `api/v2/mobile-devices/{id}[/detail]` |
//! | [`mobile_devices`] | GET `api/v2/mobile-devices` |
//!
//! List endpoints return one page as Jamf serves it by default; walking
//! further pages is left to the caller via
//! [`JamfClient::make_api_request`] with `?page=N`.

use serde::Deserialize;
use serde_json::Value;

use crate::client::JamfClient;
use crate::error::Result;
use crate::request::ApiFamily;

/// Envelope of Pro API list endpoints.
///
/// `total_count` is the number of records on the server, which may exceed
/// `results.len()` when the server paged the response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Number of matching records on the server.
    pub total_count: u64,
    /// Records in this response.
    #[serde(default)]
    pub results: Vec<Value>,
}

impl SearchResults {
    /// `true` when `results` holds every record the server reported.
    pub fn is_complete(&self) -> bool {
        self.results.len() as u64 >= self.total_count
    }
}

fn search(client: &mut JamfClient, path: &str) -> Result<SearchResults> {
    let response = client.get(path, ApiFamily::Pro)?;
    Ok(serde_json::from_value(response)?)
}

/// Retrieves the first page of computer inventory records.
pub fn computers_inventory(client: &mut JamfClient) -> Result<SearchResults> {
    search(client, "api/v1/computers-inventory")
}

/// Retrieves the mobile device with `id`.
///
/// With `with_details`, the `/detail` variant is requested, which adds
/// hardware, network, security and user sections to the record.
///
/// # Errors
///
/// - `JamfError::Api` — non-success status; 404 when no device has `id`.
pub fn mobile_device(client: &mut JamfClient, id: u64, with_details: bool) -> Result<Value> {
    let mut path = format!("api/v2/mobile-devices/{id}");
    if with_details {
        path.push_str("/detail");
    }
    client.get(&path, ApiFamily::Pro)
}

/// Retrieves the first page of mobile devices.
pub fn mobile_devices(client: &mut JamfClient) -> Result<SearchResults> {
    search(client, "api/v2/mobile-devices")
}
