//! Mock explorer API for testing.
//!
//! Serves a fixed database summary and deterministic answers based on
//! question patterns. Replies can also be scripted one by one, including
//! failures and delays, to exercise the view's submission cycle.

use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::types::{DbInfo, QueryResponse, Row};
use super::ExplorerApi;
use crate::error::{AppError, Result};

/// A scripted reply to a single query.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Respond with the given raw body, decoded like an HTTP body.
    Body(String),
    /// Respond with the given decoded response.
    Response(QueryResponse),
    /// Fail at the transport level.
    Fail,
    /// Wait, then produce the inner reply.
    Delayed(Duration, Box<MockReply>),
}

/// Mock explorer API.
#[derive(Debug)]
pub struct MockExplorerApi {
    /// Summary served by `db_info`; `None` makes the fetch fail.
    db_info: Option<DbInfo>,
    /// Scripted replies consumed in order before falling back to patterns.
    replies: Mutex<VecDeque<MockReply>>,
    /// Whether every unscripted query fails.
    fail_queries: bool,
    /// Delay applied to unscripted queries.
    query_delay: Duration,
    /// Questions received, in order.
    questions: Mutex<Vec<String>>,
}

impl MockExplorerApi {
    /// Creates a mock with the default summary and pattern answers.
    pub fn new() -> Self {
        Self {
            db_info: Some(Self::default_db_info()),
            replies: Mutex::new(VecDeque::new()),
            fail_queries: false,
            query_delay: Duration::ZERO,
            questions: Mutex::new(Vec::new()),
        }
    }

    /// Summary served when none is configured.
    pub fn default_db_info() -> DbInfo {
        DbInfo {
            total_blocks: 700000,
            min_height: 0,
            max_height: 699999,
            total_tables: 5,
        }
    }

    /// Sets the summary served by `db_info`.
    pub fn with_db_info(mut self, info: DbInfo) -> Self {
        self.db_info = Some(info);
        self
    }

    /// Makes `db_info` fail.
    pub fn with_failing_db_info(mut self) -> Self {
        self.db_info = None;
        self
    }

    /// Makes every unscripted query fail.
    pub fn with_failing_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    /// Delays every unscripted query.
    pub fn with_query_delay(mut self, delay: Duration) -> Self {
        self.query_delay = delay;
        self
    }

    /// Queues a scripted reply.
    pub fn with_reply(self, reply: MockReply) -> Self {
        self.push_reply(reply);
        self
    }

    /// Queues a scripted reply on a shared mock.
    pub fn push_reply(&self, reply: MockReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Returns the questions received so far.
    pub fn questions(&self) -> Vec<String> {
        self.questions
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    /// Produces a deterministic answer for a question.
    fn pattern_response(question: &str) -> QueryResponse {
        let q = question.to_lowercase();

        if q.contains("avg") && q.contains("size") {
            return QueryResponse::new(
                "SELECT AVG(size) FROM blocks LIMIT 100",
                vec![row(json!({"avg_size": 123456}))],
            );
        }

        if q.contains("count") && q.contains("block") {
            return QueryResponse::new(
                "SELECT COUNT(*) AS total FROM block",
                vec![row(json!({"total": 700000}))],
            );
        }

        if q.contains("nothing") || q.contains("empty") {
            return QueryResponse::new("SELECT * FROM block WHERE height < 0", vec![]);
        }

        QueryResponse::new(
            "SELECT height, hash, ntx, tx FROM block ORDER BY height DESC LIMIT 2",
            vec![
                row(json!({
                    "height": 699999,
                    "hash": "0000000000000000000b3f1a",
                    "ntx": 2,
                    "tx": ["a1f0", "b2e1"],
                })),
                row(json!({
                    "height": 699998,
                    "hash": "00000000000000000007c9d2",
                    "ntx": 1,
                    "tx": ["c3d2"],
                })),
            ],
        )
    }

    fn next_reply(&self) -> Option<MockReply> {
        self.replies.lock().ok().and_then(|mut r| r.pop_front())
    }

    async fn resolve(reply: MockReply) -> Result<QueryResponse> {
        let mut reply = reply;
        loop {
            match reply {
                MockReply::Body(body) => return QueryResponse::from_json(&body),
                MockReply::Response(response) => return Ok(response),
                MockReply::Fail => return Err(AppError::http("Mock query failure")),
                MockReply::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                }
            }
        }
    }
}

fn row(value: serde_json::Value) -> Row {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Row::new(),
    }
}

impl Default for MockExplorerApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExplorerApi for MockExplorerApi {
    async fn db_info(&self) -> Result<DbInfo> {
        self.db_info
            .ok_or_else(|| AppError::http("Mock database info failure"))
    }

    async fn query(&self, question: &str) -> Result<QueryResponse> {
        if let Ok(mut questions) = self.questions.lock() {
            questions.push(question.to_string());
        }

        if let Some(reply) = self.next_reply() {
            return Self::resolve(reply).await;
        }

        if !self.query_delay.is_zero() {
            tokio::time::sleep(self.query_delay).await;
        }

        if self.fail_queries {
            return Err(AppError::http("Mock query failure"));
        }

        Ok(Self::pattern_response(question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_db_info() {
        let api = MockExplorerApi::new();
        assert_eq!(api.db_info().await.unwrap().total_blocks, 700000);
    }

    #[tokio::test]
    async fn test_failing_db_info() {
        let api = MockExplorerApi::new().with_failing_db_info();
        assert!(api.db_info().await.is_err());
    }

    #[tokio::test]
    async fn test_pattern_avg_size() {
        let api = MockExplorerApi::new();
        let response = api.query("avg block size last 100 blocks").await.unwrap();
        assert_eq!(
            response.sql.as_deref(),
            Some("SELECT AVG(size) FROM blocks LIMIT 100")
        );
        assert_eq!(response.results.unwrap().columns(), vec!["avg_size"]);
    }

    #[tokio::test]
    async fn test_scripted_replies_consumed_in_order() {
        let api = MockExplorerApi::new()
            .with_reply(MockReply::Fail)
            .with_reply(MockReply::Body(r#"{"sql": "SELECT 1", "results": []}"#.to_string()));

        assert!(api.query("first").await.is_err());
        let second = api.query("second").await.unwrap();
        assert_eq!(second.sql.as_deref(), Some("SELECT 1"));
        assert!(second.results.unwrap().is_empty());

        // Falls back to patterns afterwards
        assert!(api.query("count blocks").await.is_ok());
        assert_eq!(api.questions(), vec!["first", "second", "count blocks"]);
    }

    #[tokio::test]
    async fn test_delayed_reply() {
        let api = MockExplorerApi::new().with_reply(MockReply::Delayed(
            Duration::from_millis(5),
            Box::new(MockReply::Fail),
        ));
        assert!(api.query("slow").await.is_err());
    }

    #[tokio::test]
    async fn test_failing_queries() {
        let api = MockExplorerApi::new().with_failing_queries();
        assert!(api.query("anything").await.is_err());
    }
}
