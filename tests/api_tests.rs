/// HTTP API tests
/// Drives the router in-process with tower's `oneshot`
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use rust_indicator_api::config::Config;
use rust_indicator_api::evaluator::Evaluator;
use rust_indicator_api::handlers::{api_routes, app, AppState};
use rust_indicator_api::loader::RosterLoader;
use rust_indicator_api::models::{EmployeeRecord, RosterSource};
use rust_indicator_api::roster::{RosterSnapshot, RosterStore};
use rust_indicator_api::targets::TargetTable;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Helper function to create test config
fn create_test_config(sheet_url: String, cache_path: PathBuf) -> Config {
    Config {
        port: 8080,
        sheet_url,
        cache_path,
        cache_max_age: Duration::from_secs(3600),
        refresh_interval: Duration::from_secs(900),
        request_timeout: Duration::from_secs(2),
        targets_path: None,
    }
}

fn test_app(cache_dir: &tempfile::TempDir) -> Router {
    let records = vec![
        EmployeeRecord::new("N1000001", "ANA SOUZA", "MÓVEL", "82%", "86%", "90%"),
        EmployeeRecord::new("N1000002", "BRUNO LIMA", "RESIDENCIAL", "85%", "92%", "60%"),
        EmployeeRecord::new("N1000003", "CAIO REIS", "EMPRESARIAL", "-", "-", "-"),
    ];
    let store = Arc::new(RosterStore::new(RosterSnapshot::from_records(
        records,
        RosterSource::Remote,
        Some(Utc::now()),
    )));

    // Nothing listens on port 9; refresh always falls back
    let config = create_test_config(
        "http://127.0.0.1:9/roster.xlsx".to_string(),
        cache_dir.path().join("roster.json"),
    );
    let loader = Arc::new(RosterLoader::from_config(&config, store.clone()).unwrap());

    let state = Arc::new(AppState {
        store,
        loader,
        evaluator: Evaluator::new(TargetTable::default()),
    });
    app(state, api_routes())
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(test_app(&dir), "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_consulta_mobile_employee() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(test_app(&dir), "GET", "/api/v1/consulta?matricula=n1000001").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matricula"], "N1000001");
    assert_eq!(body["result"]["certifying"], true);
    assert_eq!(body["result"]["advisory_below_individual_target"], true);
    assert_eq!(body["verdict"], "Certificando");
    assert_eq!(
        body["advisory"],
        "Certificando, mas abaixo da meta individual (90%)"
    );
}

#[tokio::test]
async fn test_employee_by_path_not_certifying() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(test_app(&dir), "GET", "/api/v1/employees/N1000002").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["assertiveness_ok"], false);
    assert_eq!(body["verdict"], "Não certificando");
    assert!(body["advisory"].is_null());
}

#[tokio::test]
async fn test_enterprise_assertiveness_is_null() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(test_app(&dir), "GET", "/api/v1/employees/n1000003").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["result"]["assertiveness_ok"].is_null());
    assert_eq!(body["result"]["certifying"], true);
    assert_eq!(body["indicators"][1]["value"], "N/A");
}

#[tokio::test]
async fn test_consulta_empty_matricula_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();

    let (status, body) = send(test_app(&dir), "GET", "/api/v1/consulta?matricula=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Por favor, digite uma matrícula.");

    let (status, _) = send(test_app(&dir), "GET", "/api/v1/consulta").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_matricula_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(test_app(&dir), "GET", "/api/v1/employees/X0000000").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Matrícula não encontrada.");
}

#[tokio::test]
async fn test_roster_status() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(test_app(&dir), "GET", "/api/v1/roster/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "remote");
    assert_eq!(body["record_count"], 3);
}

#[tokio::test]
async fn test_targets_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(test_app(&dir), "GET", "/api/v1/targets").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["etit"]["mobile"], 80.0);
    assert!(body["assertiveness"]["enterprise"].is_null());
    assert_eq!(body["dpa"]["certification"], 85.0);
}

#[tokio::test]
async fn test_manual_refresh_falls_back_when_sheet_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(app.clone(), "POST", "/api/v1/roster/refresh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
    assert!(body["loaded_at"].is_null());

    let (status, body) = send(app.clone(), "GET", "/api/v1/employees/N6088107").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data_updated_at"], "-");

    let (_, body) = send(app, "GET", "/api/v1/roster/status").await;
    assert!(body["loaded_at"].is_null());
    assert_eq!(body["updated_label"], "-");
}
