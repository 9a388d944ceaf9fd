//! Scripted sessions against the mock API, one per observable behavior of
//! the explorer view.

use super::common::run_script;
use block_glance::api::{DbInfo, MockExplorerApi, MockReply};
use pretty_assertions::assert_eq;
use std::time::Duration;

#[tokio::test]
async fn test_summary_card_shows_values() {
    let api = MockExplorerApi::new().with_db_info(DbInfo {
        total_blocks: 700000,
        min_height: 0,
        max_height: 699999,
        total_tables: 5,
    });
    let result = run_script(
        api,
        "assert:contains-exact:Loading database information..., settle, \
         assert:contains-exact:Total Blocks, assert:contains-exact:700000, \
         assert:contains-exact:0 - 699999, assert:contains-exact:Total Tables, \
         assert:not-contains:Loading database information",
    )
    .await;

    assert_eq!(result.failures, Vec::<String>::new(), "{}", result.screen);
}

#[tokio::test]
async fn test_info_failure_keeps_placeholder() {
    let api = MockExplorerApi::new().with_failing_db_info();
    let result = run_script(
        api,
        "settle, assert:contains-exact:Loading database information..., \
         assert:state:error=Failed to fetch database info",
    )
    .await;

    assert_eq!(result.failures, Vec::<String>::new(), "{}", result.screen);
    assert!(!result.state.has_db_info);
}

#[tokio::test]
async fn test_submission_cycle() {
    let script = "settle, type:avg block size last 100 blocks, key:enter, \
                  assert:state:loading=true, assert:contains-exact:[ Processing... ], \
                  key:enter, assert:state:history_len=1, \
                  settle, assert:state:loading=false, \
                  assert:contains-exact:[ Submit Question ], \
                  assert:contains-exact:SELECT AVG(size) FROM blocks LIMIT 100, \
                  assert:matches:│\\s*avg_size\\s*│, assert:matches:│\\s*123456\\s*│, \
                  assert:contains-exact:1 row";
    let api = MockExplorerApi::new()
        .with_query_delay(Duration::from_millis(100));
    let result = run_script(api, script).await;

    assert_eq!(result.failures, Vec::<String>::new(), "{}", result.screen);
    // The question stays in the field after submitting
    assert_eq!(result.state.input_text, "avg block size last 100 blocks");
}

#[tokio::test]
async fn test_enter_is_ignored_while_loading() {
    let api = MockExplorerApi::new().with_reply(MockReply::Delayed(
        Duration::from_millis(200),
        Box::new(MockReply::Body(
            r#"{"sql": "SELECT 1", "results": [{"one": 1}]}"#.to_string(),
        )),
    ));
    let api = std::sync::Arc::new(api);

    let mut runner = block_glance::tui::headless::HeadlessRunner::new(Default::default())
        .unwrap()
        .with_api(api.clone());
    runner.load_events("key:enter, key:enter, key:enter, settle").unwrap();
    let result = runner.run().await.unwrap();

    assert!(!result.state.loading);
    assert_eq!(api.questions(), vec![String::new()]);
}

#[tokio::test]
async fn test_failure_keeps_previous_answer() {
    let api = MockExplorerApi::new()
        .with_reply(MockReply::Body(
            r#"{"sql": "SELECT height FROM block", "results": [{"height": 1}, {"height": 2}]}"#
                .to_string(),
        ))
        .with_reply(MockReply::Fail);
    let script = "settle, key:enter, settle, key:enter, settle, \
                  assert:contains-exact:Failed to process query, \
                  assert:contains-exact:SELECT height FROM block, \
                  assert:state:result_rows=2, assert:state:loading=false";
    let result = run_script(api, script).await;

    assert_eq!(result.failures, Vec::<String>::new(), "{}", result.screen);
}

#[tokio::test]
async fn test_empty_results_render_empty_table() {
    let api = MockExplorerApi::new().with_reply(MockReply::Body(
        r#"{"sql": "SELECT * FROM block WHERE height < 0", "results": []}"#.to_string(),
    ));
    let script = "settle, key:enter, settle, \
                  assert:contains-exact:Query Results, assert:contains-exact:┌┐, \
                  assert:contains-exact:└┘, assert:contains-exact:0 rows, \
                  assert:state:result_rows=0";
    let result = run_script(api, script).await;

    assert_eq!(result.failures, Vec::<String>::new(), "{}", result.screen);
}

#[tokio::test]
async fn test_nested_cell_renders_as_json() {
    let api = MockExplorerApi::new().with_reply(MockReply::Body(
        r#"{"sql": "SELECT meta FROM block", "results": [{"meta": {"a": 1}}]}"#.to_string(),
    ));
    let result = run_script(api, "settle, key:enter, settle").await;

    assert!(result.screen.contains(r#"{"a":1}"#), "{}", result.screen);
}

#[tokio::test]
async fn test_missing_fields_hide_cards() {
    let api = MockExplorerApi::new().with_reply(MockReply::Body(
        r#"{"error": "could not translate question"}"#.to_string(),
    ));
    let script = "settle, key:enter, settle, \
                  assert:not-contains:Generated SQL Query, \
                  assert:not-contains:Query Results, \
                  assert:state:has_error=false";
    let result = run_script(api, script).await;

    assert_eq!(result.failures, Vec::<String>::new(), "{}", result.screen);
}

#[tokio::test]
async fn test_history_recall() {
    let script = "settle, type:count blocks, key:enter, settle, \
                  key:ctrl+r, settle, \
                  type: today, assert:state:input_text=count blocks today, \
                  key:up, assert:state:input_text=count blocks, \
                  key:down, assert:state:input_text=count blocks today";
    let result = run_script(MockExplorerApi::new(), script).await;

    assert_eq!(result.failures, Vec::<String>::new(), "{}", result.screen);
}
