#![allow(clippy::unwrap_used)]
// Integration tests for `RestHost` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use logsweep_api::{Error, HostApi, RestHost};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RestHost) {
    let server = MockServer::start().await;
    let host = RestHost::new(&server.uri()).unwrap();
    (server, host)
}

// ── Viewer path ─────────────────────────────────────────────────────

#[tokio::test]
async fn resolve_server_root_truncates_viewer_path() {
    let (server, host) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/viewer/path"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "path": "/Server 1/Diagnostics/Error Page"
        })))
        .mount(&server)
        .await;

    let root = host.resolve_server_root().await.unwrap();
    assert_eq!(root, "/Server 1");
}

// ── Children listing ────────────────────────────────────────────────

#[tokio::test]
async fn list_children_sends_query_and_decodes_camel_case() {
    let (server, host) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/objects/children"))
        .and(query_param("path", "/Server 1"))
        .and(query_param("names", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "path": "/Server 1/BACnet Interface", "typeName": "bacnet.Device" },
            { "path": "/Server 1/Folder", "typeName": "system.base.Folder", "description": "misc" }
        ])))
        .mount(&server)
        .await;

    let children = host.list_children("/Server 1", false).await.unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].type_name, "bacnet.Device");
    assert_eq!(children[1].description, "misc");
}

// ── Object batch ────────────────────────────────────────────────────

#[tokio::test]
async fn get_objects_posts_paths_and_decodes_map() {
    let (server, host) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/objects/batch"))
        .and(body_json(json!({ "paths": ["/Server 1/IP/Dev A"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "/Server 1/IP/Dev A": {
                "path": "/Server 1/IP/Dev A",
                "typeName": "bacnet.b3.Device",
                "properties": {
                    "Status": { "value": { "high": 0, "low": 1, "unsigned": false } }
                }
            }
        })))
        .mount(&server)
        .await;

    let objects = host
        .get_objects(&["/Server 1/IP/Dev A".to_owned()])
        .await
        .unwrap();
    let info = &objects["/Server 1/IP/Dev A"];
    assert_eq!(info.properties["Status"].as_i64(), Some(1));
}

// ── File reads ──────────────────────────────────────────────────────

#[tokio::test]
async fn read_file_returns_raw_text() {
    let (server, host) = setup().await;

    let text = "Generated at: 2024-01-01\r\nDevice: DEV1\r\n";
    Mock::given(method("GET"))
        .and(path("/api/v1/files/content"))
        .and(query_param(
            "path",
            "/Server 1/IP/Dev A/Diagnostic Files/Error Log",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(text))
        .mount(&server)
        .await;

    let body = host
        .read_file("/Server 1/IP/Dev A/Diagnostic Files/Error Log")
        .await
        .unwrap();
    assert_eq!(body, text);
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn host_errors_carry_status_and_message() {
    let (server, host) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/files/content"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "device unreachable" })),
        )
        .mount(&server)
        .await;

    let err = host.read_file("/Server 1/IP/Dev A").await.unwrap_err();
    match err {
        Error::Host { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "device unreachable");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_files_map_to_not_found() {
    let (server, host) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/files/content"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = host.read_file("/Server 1/IP/Dev A").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn undecodable_bodies_keep_the_raw_payload() {
    let (server, host) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/viewer/path"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = host.resolve_server_root().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert!(body.contains("login")),
        other => panic!("unexpected error: {other}"),
    }
}
