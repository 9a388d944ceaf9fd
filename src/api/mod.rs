//! Explorer API client.
//!
//! The backend is consumed through two endpoints: `GET /api/db-info` and
//! `POST /api/query`. Both are exposed through the [`ExplorerApi`] trait so
//! the view can run against the real HTTP client or an in-memory mock.

pub mod http;
pub mod mock;
pub mod types;

pub use http::HttpExplorerApi;
pub use mock::{MockExplorerApi, MockReply};
pub use types::{cell_text, DbInfo, QueryRequest, QueryResponse, QueryResult, Row};

use async_trait::async_trait;

use crate::error::Result;

/// Path of the database summary endpoint.
pub const DB_INFO_PATH: &str = "/api/db-info";

/// Path of the question endpoint.
pub const QUERY_PATH: &str = "/api/query";

/// Trait for explorer backends.
///
/// Implementations must be thread-safe (Send + Sync) so calls can run on
/// spawned tasks.
#[async_trait]
pub trait ExplorerApi: Send + Sync {
    /// Fetches the database summary statistics.
    async fn db_info(&self) -> Result<DbInfo>;

    /// Submits a natural-language question and returns the decoded body.
    async fn query(&self, question: &str) -> Result<QueryResponse>;
}
