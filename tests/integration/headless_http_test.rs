//! Headless sessions driven end to end over HTTP.

use super::fake_backend::FakeBackend;
use axum::http::StatusCode;
use block_glance::api::HttpExplorerApi;
use block_glance::tui::headless::{HeadlessConfig, HeadlessResult, HeadlessRunner};
use std::sync::Arc;
use std::time::Duration;

async fn run(backend: &FakeBackend, script: &str) -> HeadlessResult {
    let api = HttpExplorerApi::new(&backend.base_url(), Duration::from_secs(5)).unwrap();
    let mut runner = HeadlessRunner::new(HeadlessConfig::default())
        .unwrap()
        .with_api(Arc::new(api))
        .with_endpoint(backend.base_url());
    runner.load_events(script).unwrap();
    runner.run().await.unwrap()
}

#[tokio::test]
async fn test_summary_and_answer_over_http() {
    let backend = FakeBackend::start().await;
    let script = "settle, \
                  assert:contains-exact:700000, \
                  assert:contains-exact:0 - 699999, \
                  type:avg block size last 100 blocks, \
                  key:enter, \
                  assert:contains-exact:Processing..., \
                  settle, \
                  assert:contains-exact:SELECT AVG(size) FROM blocks LIMIT 100, \
                  assert:matches:│\\s*avg_size\\s*│, \
                  assert:matches:│\\s*123456\\s*│, \
                  assert:contains-exact:Submit Question";
    let result = run(&backend, script).await;

    assert_eq!(result.assertions_failed, 0, "{:?}\n{}", result.failures, result.screen);
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_info_failure_over_http() {
    let backend = FakeBackend::start().await;
    backend.set_db_info(StatusCode::SERVICE_UNAVAILABLE, "unavailable");

    let result = run(
        &backend,
        "settle, assert:contains-exact:Loading database information..., \
         assert:contains-exact:Failed to fetch database info",
    )
    .await;

    assert_eq!(result.assertions_failed, 0, "{:?}\n{}", result.failures, result.screen);
}

#[tokio::test]
async fn test_query_failure_keeps_previous_answer() {
    let backend = FakeBackend::start().await;
    backend.queue_query(StatusCode::OK, super::fake_backend::AVG_SIZE_BODY);
    backend.queue_query(StatusCode::BAD_GATEWAY, "<html>down</html>");

    let script = "settle, type:avg size, key:enter, settle, \
                  assert:state:has_results=true, \
                  key:enter, settle, \
                  assert:contains-exact:Failed to process query, \
                  assert:contains-exact:SELECT AVG(size) FROM blocks LIMIT 100, \
                  assert:state:result_rows=1, \
                  assert:contains-exact:Submit Question";
    let result = run(&backend, script).await;

    assert_eq!(result.assertions_failed, 0, "{:?}\n{}", result.failures, result.screen);
    assert_eq!(backend.requests().len(), 2);
}

#[tokio::test]
async fn test_new_submission_clears_banner() {
    let backend = FakeBackend::start().await;
    backend.queue_query(StatusCode::OK, "not json");

    let script = "settle, key:enter, settle, \
                  assert:state:has_error=true, \
                  key:enter, assert:state:has_error=false, \
                  assert:not-contains:Failed to process query, \
                  settle, assert:state:has_results=true";
    let result = run(&backend, script).await;

    assert_eq!(result.assertions_failed, 0, "{:?}\n{}", result.failures, result.screen);
}
