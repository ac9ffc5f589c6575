//! Integration tests for the Classic API wrappers using mockito.
//!
//! - GET  /JSSResource/computers                      — computers
//! - GET  /JSSResource/computers/id/{id}              — computer
//! - GET  /JSSResource/mobiledevices                  — mobile_devices
//! - GET  /JSSResource/mobiledevices/id/{id}          — mobile_device
//! - GET  /JSSResource/mobiledevices/match/{term}     — search_mobile_devices
//! - POST /JSSResource/classes/id/0                   — create_class

use chrono::{Duration, Utc};
use jamf_pro::classic::*;
use jamf_pro::client::JamfClient;
use jamf_pro::error::JamfError;
use mockito::{Matcher, Server, ServerGuard};
use reqwest::StatusCode;

/// Helper: creates a client with a valid cached token pointed at the mock server.
fn mock_client(server: &ServerGuard) -> JamfClient {
    let mut client = JamfClient::new(&server.url(), "user", "pass").unwrap();
    client
        .auth_mut()
        .set_token("mock-token", Utc::now() + Duration::hours(1));
    client
}

// ── computers ───────────────────────────────────────────────────────────

#[test]
fn computers_returns_every_record() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/JSSResource/computers")
        .match_header("accept", "application/xml")
        .with_status(200)
        .with_body(
            "<computers><size>2</size>\
             <computer><id>1</id><name>Lab-Mac-01</name></computer>\
             <computer><id>2</id><name>Lab-Mac-02</name></computer>\
             </computers>",
        )
        .create();

    let mut client = mock_client(&server);
    let computers = computers(&mut client).unwrap();

    assert_eq!(computers.len(), 2);
    assert_eq!(computers[0]["id"], "1");
    assert_eq!(computers[1]["name"], "Lab-Mac-02");
}

#[test]
fn computers_with_single_record_is_still_a_list() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/JSSResource/computers")
        .with_status(200)
        .with_body("<computers><size>1</size><computer><id>1</id><name>Solo</name></computer></computers>")
        .create();

    let mut client = mock_client(&server);
    let computers = computers(&mut client).unwrap();
    assert_eq!(computers.len(), 1);
    assert_eq!(computers[0]["name"], "Solo");
}

#[test]
fn computers_empty_collection() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/JSSResource/computers")
        .with_status(200)
        .with_body("<computers><size>0</size></computers>")
        .create();

    let mut client = mock_client(&server);
    assert!(computers(&mut client).unwrap().is_empty());
}

// ── computer ────────────────────────────────────────────────────────────

#[test]
fn computer_returns_inner_record() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/JSSResource/computers/id/12")
        .with_status(200)
        .with_body(
            "<computer><general><id>12</id><name>Art-Mac</name>\
             <serial_number>C02XK0AAJGH6</serial_number></general></computer>",
        )
        .create();

    let mut client = mock_client(&server);
    let computer = computer(&mut client, 12).unwrap();
    assert_eq!(computer["general"]["serial_number"], "C02XK0AAJGH6");
}

#[test]
fn computer_not_found_propagates_api_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/JSSResource/computers/id/404")
        .with_status(404)
        .with_body("Not Found")
        .create();

    let mut client = mock_client(&server);
    let err = computer(&mut client, 404).unwrap_err();
    assert!(matches!(
        err,
        JamfError::Api { status, .. } if status == StatusCode::NOT_FOUND
    ));
}

#[test]
fn computer_with_wrong_root_is_unexpected() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/JSSResource/computers/id/3")
        .with_status(200)
        .with_body("<mobile_device><general/></mobile_device>")
        .create();

    let mut client = mock_client(&server);
    let err = computer(&mut client, 3).unwrap_err();
    assert!(matches!(err, JamfError::UnexpectedResponse(_)));
}

// ── mobile devices ──────────────────────────────────────────────────────

#[test]
fn mobile_device_returns_inner_record() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/JSSResource/mobiledevices/id/5")
        .with_status(200)
        .with_body(
            "<mobile_device><general><id>5</id><device_name>Cart 1-5</device_name></general>\
             <location><username>jdoe</username></location></mobile_device>",
        )
        .create();

    let mut client = mock_client(&server);
    let device = mobile_device(&mut client, 5).unwrap();
    assert_eq!(device["general"]["device_name"], "Cart 1-5");
    assert_eq!(device["location"]["username"], "jdoe");
}

#[test]
fn mobile_devices_returns_every_record() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/JSSResource/mobiledevices")
        .with_status(200)
        .with_body(
            "<mobile_devices><size>2</size>\
             <mobile_device><id>5</id><name>Cart 1-5</name></mobile_device>\
             <mobile_device><id>6</id><name>Cart 1-6</name></mobile_device>\
             </mobile_devices>",
        )
        .create();

    let mut client = mock_client(&server);
    let devices = mobile_devices(&mut client).unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[1]["id"], "6");
}

#[test]
fn search_mobile_devices_encodes_the_term() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/JSSResource/mobiledevices/match/Cart%201*")
        .with_status(200)
        .with_body(
            "<mobile_devices><size>1</size>\
             <mobile_device><id>5</id><name>Cart 1-5</name></mobile_device>\
             </mobile_devices>",
        )
        .expect(1)
        .create();

    let mut client = mock_client(&server);
    let devices = search_mobile_devices(&mut client, "Cart 1*").unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0]["name"], "Cart 1-5");
    mock.assert();
}

// ── create_class ────────────────────────────────────────────────────────

#[test]
fn create_class_posts_xml_and_returns_id() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/JSSResource/classes/id/0")
        .match_header("content-type", "application/xml")
        .match_body(Matcher::Exact(
            "<class><name>Biology 101</name><description>Period 3</description>\
             <type>Usernames</type><students><student>ann</student></students>\
             <teachers><teacher>mr.smith</teacher></teachers></class>"
                .to_string(),
        ))
        .with_status(201)
        .with_body(r#"<?xml version="1.0" encoding="UTF-8"?><class><id>31</id></class>"#)
        .expect(1)
        .create();

    let class = ClassRecord {
        name: "Biology 101".to_string(),
        description: "Period 3".to_string(),
        students: vec!["ann".to_string()],
        teachers: vec!["mr.smith".to_string()],
    };

    let mut client = mock_client(&server);
    let id = create_class(&mut client, &class).unwrap();
    assert_eq!(id, "31");
    mock.assert();
}

#[test]
fn create_class_conflict_propagates_api_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/JSSResource/classes/id/0")
        .with_status(409)
        .with_body("Error: Duplicate name")
        .create();

    let mut client = mock_client(&server);
    let err = create_class(&mut client, &ClassRecord::default()).unwrap_err();
    match err {
        JamfError::Api { status, body } => {
            assert_eq!(status, StatusCode::CONFLICT);
            assert!(body.contains("Duplicate name"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
