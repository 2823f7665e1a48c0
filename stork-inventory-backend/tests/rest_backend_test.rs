//! PostgREST backend tests against a wiremock server.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stork_inventory_backend::{
    BackendError, InstalledSoftwareSource, PcRecord, PrinterDraft, PrinterRecord, RecordBackend,
    RestBackend, RestConfig, RestInstalledSoftware,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config(server: &MockServer) -> RestConfig {
    RestConfig::new(&server.uri(), "anon-key")
        .unwrap()
        .with_access_token(Some("user-jwt".to_string()))
        .with_max_read_retries(0)
}

async fn printers() -> (MockServer, RestBackend<PrinterRecord>) {
    let server = MockServer::start().await;
    let backend = RestBackend::new(config(&server)).unwrap();
    (server, backend)
}

fn printer_row(id: i64, brand: &str, model: &str, ip: &str) -> serde_json::Value {
    json!({
        "id": id,
        "brand": brand,
        "model": model,
        "ip_address": ip,
        "is_hidden": false,
        "hidden_at": null,
        "created_at": "2024-01-01T00:00:00+00:00",
        "updated_at": "2024-01-01T00:00:00+00:00"
    })
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_all_sends_auth_and_order() {
    let (server, backend) = printers().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/printers"))
        .and(query_param("order", "id.desc"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer user-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            printer_row(2, "HP", "M404", "10.0.0.2"),
            printer_row(1, "Brother", "HL", "10.0.0.1"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = backend.list_all().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].meta.id, 2);
    assert_eq!(rows[1].data.brand.as_deref(), Some("Brother"));
}

#[tokio::test]
async fn test_search_uses_or_ilike_filter() {
    let (server, backend) = printers().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/printers"))
        .and(query_param(
            "or",
            r#"(brand.ilike."*hp*",model.ilike."*hp*",ip_address.ilike."*hp*",notes.ilike."*hp*",notes_ii.ilike."*hp*",asset_id.ilike."*hp*")"#,
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([printer_row(5, "HP", "M404", "10.0.0.5")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let rows = backend.search("  hp ").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].meta.id, 5);
}

#[tokio::test]
async fn test_blank_search_lists_all() {
    let (server, backend) = printers().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/printers"))
        .and(query_param("select", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(backend.search("").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_pc_search_unions_software_matches() {
    let server = MockServer::start().await;
    let software = Arc::new(RestInstalledSoftware::new(config(&server)).unwrap());
    let backend = RestBackend::<PcRecord>::new(config(&server))
        .unwrap()
        .with_software(software);

    Mock::given(method("GET"))
        .and(path("/rest/v1/pcinfo"))
        .and(query_param("select", "*"))
        .and(query_param("order", "id.desc"))
        .and(query_param("id", "in.(9,3)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 9, "computer_name": "LAB-09" },
            { "id": 3, "computer_name": "LAB-03" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/pcinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 12, "computer_name": "OFFICE-OFFICE" },
            { "id": 4, "computer_name": "OFFICE-04" },
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/installed_software"))
        .and(query_param("select", "pcinfo_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "pcinfo_id": 9 },
            { "pcinfo_id": 4 },
            { "pcinfo_id": 9 },
            { "pcinfo_id": 3 },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let ids: Vec<i64> = backend
        .search("office")
        .await
        .unwrap()
        .iter()
        .map(|r| r.meta.id)
        .collect();
    assert_eq!(ids, vec![12, 9, 4, 3]);
}

#[tokio::test]
async fn test_installed_software_by_record() {
    let server = MockServer::start().await;
    let source = RestInstalledSoftware::new(config(&server)).unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/installed_software"))
        .and(query_param("pcinfo_id", "eq.7"))
        .and(query_param("order", "software_name.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "pcinfo_id": 7, "software_name": "7-Zip", "version": "23.01", "publisher": "Igor Pavlov" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let list = source.list_by_record(7).await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].publisher.as_deref(), Some("Igor Pavlov"));
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_returns_representation() {
    let (server, backend) = printers().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/printers"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({ "brand": "HP", "model": "M404" })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([printer_row(10, "HP", "M404", "10.0.0.10")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let draft = PrinterDraft {
        brand: Some("HP".to_string()),
        model: Some("M404".to_string()),
        ip_address: Some("10.0.0.10".to_string()),
        ..Default::default()
    };
    let created = backend.create(&draft).await.unwrap();
    assert_eq!(created.meta.id, 10);
}

#[tokio::test]
async fn test_update_without_rows_is_not_found() {
    let (server, backend) = printers().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/printers"))
        .and(query_param("id", "eq.77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = backend
        .update(77, &PrinterDraft::default())
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::NotFound { .. }), "{err:?}");
}

#[tokio::test]
async fn test_hide_patches_in_filter() {
    let (server, backend) = printers().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/printers"))
        .and(query_param("id", "in.(7,8)"))
        .and(body_partial_json(json!({ "is_hidden": true })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    backend.hide(&[7, 8]).await.unwrap();
}

#[tokio::test]
async fn test_restore_clears_hidden_at() {
    let (server, backend) = printers().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/printers"))
        .and(query_param("id", "in.(7)"))
        .and(body_partial_json(json!({ "is_hidden": false, "hidden_at": null })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    backend.restore(&[7]).await.unwrap();
}

#[tokio::test]
async fn test_permanent_delete_and_empty_ids() {
    let (server, backend) = printers().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/printers"))
        .and(query_param("id", "in.(3)"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    backend.permanent_delete(&[3]).await.unwrap();
    // 空 id 列表不发请求
    backend.permanent_delete(&[]).await.unwrap();
    backend.hide(&[]).await.unwrap();
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unique_violation_maps_to_conflict() {
    let (server, backend) = printers().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/printers"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint",
            "details": "Key (ip_address)=(10.0.0.1) already exists.",
            "hint": null
        })))
        .mount(&server)
        .await;

    let err = backend.create(&PrinterDraft::default()).await.unwrap_err();
    assert!(matches!(err, BackendError::Conflict { .. }), "{err:?}");
    assert!(err.is_expected());
}

#[tokio::test]
async fn test_expired_jwt_maps_to_unauthorized() {
    let (server, backend) = printers().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/printers"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "code": "PGRST301", "message": "JWT expired" })),
        )
        .mount(&server)
        .await;

    let err = backend.list_all().await.unwrap_err();
    assert!(matches!(err, BackendError::Unauthorized { .. }), "{err:?}");
    assert!(err.to_string().contains("JWT expired"));
}

#[tokio::test]
async fn test_read_retried_on_bad_gateway() {
    let server = MockServer::start().await;
    let backend =
        RestBackend::<PrinterRecord>::new(config(&server).with_max_read_retries(2)).unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/printers"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/printers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(backend.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_write_not_retried() {
    let (server, backend) = printers().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/printers"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = backend.permanent_delete(&[1]).await.unwrap_err();
    assert!(matches!(err, BackendError::Network { .. }), "{err:?}");
}
