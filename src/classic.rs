//! Named wrappers for the Jamf Classic API (`JSSResource/...`).
//!
//! Every function here is a thin alias over
//! [`JamfClient::make_api_request`] with [`ApiFamily::Classic`], so
//! requests and responses are XML on the wire and decoded with the
//! conventions documented in [`crate::xml`].
//!
//! | Function | API Path |
//! |----------|----------|
//! | [`computer`] | GET `JSSResource/computers/id/{id}` |
//! | [`computers`] | GET `JSSResource/computers` |
//! | [`mobile_device`] | GET `JSSResource/mobiledevices/id/{id}` |
//! | [`mobile_devices`] | GET `JSSResource/mobiledevices` |
//! | [`search_mobile_devices`] | GET `JSSResource/mobiledevices/match/{term}` |
//! | [`create_class`] | POST `JSSResource/classes/id/0` |
//!
//! ## Collections
//!
//! Classic list endpoints answer with a plural wrapper, a `size` element
//! and one singular element per record:
//!
//! ```xml
//! <computers>
//!   <size>2</size>
//!   <computer><id>1</id><name>Lab-01</name></computer>
//!   <computer><id>2</id><name>Lab-02</name></computer>
//! </computers>
//! ```
//!
//! The wrappers flatten that into a `Vec<Value>` of the singular records,
//! empty when `size` is 0.

use serde_json::{Value, json};

use crate::client::JamfClient;
use crate::error::{JamfError, Result};
use crate::request::ApiFamily;
use crate::xml::as_list;

// ── Request types ──────────────────────────────────────────────────────

/// A class to create through the Classic API.
///
/// Students and teachers are given by Jamf username.
#[derive(Debug, Clone, Default)]
pub struct ClassRecord {
    /// Class name as shown in Jamf Pro and the Classroom app.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Student usernames.
    pub students: Vec<String>,
    /// Teacher usernames.
    pub teachers: Vec<String>,
}

impl ClassRecord {
    /// The `{"class": {...}}` document sent to the Classic API.
    ///
    /// The class type is always `Usernames`: membership is by user, not by
    /// user group or device.
    pub fn to_document(&self) -> Value {
        json!({
            "class": {
                "name": self.name,
                "description": self.description,
                "type": "Usernames",
                "students": { "student": self.students },
                "teachers": { "teacher": self.teachers },
            }
        })
    }
}

// ── Helpers ────────────────────────────────────────────────────────────

/// Takes the record out of a `{root: record}` document.
fn take_root(mut document: Value, root: &str) -> Result<Value> {
    document
        .get_mut(root)
        .map(Value::take)
        .ok_or_else(|| JamfError::UnexpectedResponse(format!("missing <{root}> element")))
}

/// Flattens a `{plural: {size, singular...}}` document into its records.
fn take_list(document: Value, plural: &str, singular: &str) -> Result<Vec<Value>> {
    let mut wrapper = take_root(document, plural)?;
    Ok(as_list(wrapper.get_mut(singular).map(Value::take)))
}

/// Percent-encodes a single path segment. Spaces become `%20`; `*`
/// is left alone so Jamf's match wildcard keeps working.
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Retrieves the full inventory record of the computer with `id`.
///
/// # Errors
///
/// - `JamfError::Api` — non-success status; 404 when no computer has `id`.
/// - `JamfError::UnexpectedResponse` — the body has no `<computer>` root.
pub fn computer(client: &mut JamfClient, id: u64) -> Result<Value> {
    let path = format!("JSSResource/computers/id/{id}");
    let document = client.get(&path, ApiFamily::Classic)?;
    take_root(document, "computer")
}

/// Lists all computers (ID and name only, as the Classic API returns them).
pub fn computers(client: &mut JamfClient) -> Result<Vec<Value>> {
    let document = client.get("JSSResource/computers", ApiFamily::Classic)?;
    take_list(document, "computers", "computer")
}

/// Retrieves the full inventory record of the mobile device with `id`.
pub fn mobile_device(client: &mut JamfClient, id: u64) -> Result<Value> {
    let path = format!("JSSResource/mobiledevices/id/{id}");
    let document = client.get(&path, ApiFamily::Classic)?;
    take_root(document, "mobile_device")
}

/// Lists all mobile devices.
pub fn mobile_devices(client: &mut JamfClient) -> Result<Vec<Value>> {
    let document = client.get("JSSResource/mobiledevices", ApiFamily::Classic)?;
    take_list(document, "mobile_devices", "mobile_device")
}

/// Searches mobile devices by name, serial number, MAC address, username
/// and similar fields. `*` acts as a wildcard.
pub fn search_mobile_devices(client: &mut JamfClient, term: &str) -> Result<Vec<Value>> {
    let path = format!("JSSResource/mobiledevices/match/{}", encode_segment(term));
    let document = client.get(&path, ApiFamily::Classic)?;
    take_list(document, "mobile_devices", "mobile_device")
}

/// Creates a class and returns the ID Jamf assigned to it.
///
/// The Classic API creates records by POSTing to ID 0.
pub fn create_class(client: &mut JamfClient, class: &ClassRecord) -> Result<String> {
    client.create_record(
        "JSSResource/classes/id/0",
        ApiFamily::Classic,
        &class.to_document(),
    )
}
