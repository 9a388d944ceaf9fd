//! HTTP client tests against the fake backend.

use super::fake_backend::FakeBackend;
use axum::http::StatusCode;
use block_glance::api::{ExplorerApi, HttpExplorerApi};
use block_glance::error::AppError;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::time::Duration;

fn client(backend: &FakeBackend) -> HttpExplorerApi {
    HttpExplorerApi::new(&backend.base_url(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_db_info_success() {
    let backend = FakeBackend::start().await;
    let info = client(&backend).db_info().await.unwrap();

    assert_eq!(info.total_blocks, 700000);
    assert_eq!(info.min_height, 0);
    assert_eq!(info.max_height, 699999);
    assert_eq!(info.total_tables, 5);
}

#[tokio::test]
async fn test_db_info_error_status() {
    let backend = FakeBackend::start().await;
    backend.set_db_info(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error": "db down"}"#);

    let err = client(&backend).db_info().await.unwrap_err();
    assert!(matches!(err, AppError::Http(_)), "got {err:?}");
}

#[tokio::test]
async fn test_db_info_wrong_shape() {
    let backend = FakeBackend::start().await;
    backend.set_db_info(StatusCode::OK, r#"{"total_blocks": "many"}"#);

    let err = client(&backend).db_info().await.unwrap_err();
    assert!(matches!(err, AppError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn test_query_sends_json_question() {
    let backend = FakeBackend::start().await;
    let response = client(&backend)
        .query("avg block size last 100 blocks")
        .await
        .unwrap();

    assert_eq!(
        response.sql.as_deref(),
        Some("SELECT AVG(size) FROM blocks LIMIT 100")
    );
    let results = response.results.unwrap();
    assert_eq!(results.columns(), vec!["avg_size"]);
    assert_eq!(
        block_glance::api::QueryResult::row_cells(&results.rows()[0]),
        vec!["123456"]
    );

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body, serde_json::json!({ "question": "avg block size last 100 blocks" }));
}

#[tokio::test]
async fn test_empty_question_is_sent() {
    let backend = FakeBackend::start().await;
    client(&backend).query("").await.unwrap();

    let body: Value = serde_json::from_str(&backend.requests()[0].body).unwrap();
    assert_eq!(body["question"], "");
}

#[tokio::test]
async fn test_query_body_decoded_despite_error_status() {
    let backend = FakeBackend::start().await;
    backend.set_query(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error": "bad question"}"#);

    let response = client(&backend).query("???").await.unwrap();
    assert_eq!(response.sql, None);
    assert_eq!(response.results, None);
}

#[tokio::test]
async fn test_query_non_json_body_fails() {
    let backend = FakeBackend::start().await;
    backend.set_query(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>");

    let err = client(&backend).query("anything").await.unwrap_err();
    assert!(matches!(err, AppError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn test_query_timeout() {
    let backend = FakeBackend::start().await;
    backend.set_query_delay(Duration::from_secs(5));

    let api = HttpExplorerApi::new(&backend.base_url(), Duration::from_millis(200)).unwrap();
    let err = api.query("slow").await.unwrap_err();
    assert!(matches!(err, AppError::Http(_)), "got {err:?}");
}

#[tokio::test]
async fn test_connection_refused() {
    let backend = FakeBackend::start().await;
    let base_url = backend.base_url();
    drop(backend);
    tokio::time::sleep(Duration::from_millis(50)).await;

    let api = HttpExplorerApi::new(&base_url, Duration::from_secs(2)).unwrap();
    let err = api.db_info().await.unwrap_err();
    assert!(matches!(err, AppError::Http(_)), "got {err:?}");
}
