//! The query view's state container.
//!
//! Every field is replaced by the most recent outcome of the request that
//! feeds it. Requests are tagged with sequence numbers, and an outcome that
//! does not belong to the latest request of its kind is discarded, so a slow
//! earlier response can never overwrite a newer one.

use crate::api::{DbInfo, QueryResponse, QueryResult};
use crate::error::Result;
use tracing::{debug, warn};

/// Banner text when the database summary cannot be loaded.
pub const INFO_FETCH_ERROR: &str = "Failed to fetch database info";

/// Banner text when a question cannot be processed.
pub const QUERY_SUBMIT_ERROR: &str = "Failed to process query";

/// Sequence number identifying one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(u64);

impl RequestSeq {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A question ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub seq: RequestSeq,
    pub question: String,
}

/// View state: what the screen shows, independent of how it is drawn.
#[derive(Debug, Default)]
pub struct ViewState {
    /// Database summary, absent until the first successful fetch.
    pub db_info: Option<DbInfo>,
    /// SQL from the latest answered question.
    pub sql: Option<String>,
    /// Rows from the latest answered question.
    pub results: Option<QueryResult>,
    /// Whether a question is in flight.
    pub loading: bool,
    /// Banner text.
    pub error: Option<String>,
    next_seq: u64,
    latest_query: Option<RequestSeq>,
    latest_info: Option<RequestSeq>,
    info_loading: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_seq(&mut self) -> RequestSeq {
        self.next_seq += 1;
        RequestSeq(self.next_seq)
    }

    /// Starts a database summary fetch.
    pub fn begin_info_fetch(&mut self) -> RequestSeq {
        let seq = self.allocate_seq();
        self.latest_info = Some(seq);
        self.info_loading = true;
        seq
    }

    /// Applies the outcome of a database summary fetch.
    ///
    /// Returns false if the outcome was stale and discarded.
    pub fn apply_info(&mut self, seq: RequestSeq, outcome: Result<DbInfo>) -> bool {
        if self.latest_info != Some(seq) {
            debug!("Discarding stale database info response {}", seq);
            return false;
        }
        self.info_loading = false;

        match outcome {
            Ok(info) => self.db_info = Some(info),
            Err(e) => {
                warn!("Database info fetch failed: {}: {}", e.category(), e);
                self.error = Some(INFO_FETCH_ERROR.to_string());
            }
        }
        true
    }

    /// Starts a submission cycle: marks the view as loading, clears the
    /// banner and tags the question with a new sequence number.
    pub fn begin_submit(&mut self, question: impl Into<String>) -> Submission {
        let seq = self.allocate_seq();
        self.latest_query = Some(seq);
        self.loading = true;
        self.error = None;
        Submission {
            seq,
            question: question.into(),
        }
    }

    /// Applies the outcome of a submission.
    ///
    /// On success both SQL and rows are replaced by what the server sent,
    /// absent fields included. On failure the previous SQL and rows stay.
    /// Returns false if the outcome was stale and discarded.
    pub fn apply_query(&mut self, seq: RequestSeq, outcome: Result<QueryResponse>) -> bool {
        if self.latest_query != Some(seq) {
            debug!("Discarding stale query response {}", seq);
            return false;
        }
        self.loading = false;

        match outcome {
            Ok(response) => {
                self.sql = response.sql;
                self.results = response.results;
            }
            Err(e) => {
                warn!("Query failed: {}: {}", e.category(), e);
                self.error = Some(QUERY_SUBMIT_ERROR.to_string());
            }
        }
        true
    }

    /// Returns the SQL to show, if it is non-empty.
    pub fn visible_sql(&self) -> Option<&str> {
        self.sql.as_deref().filter(|sql| !sql.is_empty())
    }

    /// Returns true while the database summary is being fetched.
    pub fn is_fetching_info(&self) -> bool {
        self.info_loading
    }

    /// Returns true while any request is in flight.
    pub fn is_busy(&self) -> bool {
        self.loading || self.info_loading
    }

    /// Returns the sequence number of the latest submission, if any.
    pub fn latest_query(&self) -> Option<RequestSeq> {
        self.latest_query
    }
}
