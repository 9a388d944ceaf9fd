//! Background request tasks.
//!
//! Each network call runs on its own tokio task and reports back to the UI
//! loop over a channel. The UI loop is the only writer of view state; tasks
//! never touch it. All tasks share one cancellation token, cancelled when
//! the view is torn down.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::app::Action;
use super::view::{RequestSeq, Submission};
use crate::api::{DbInfo, ExplorerApi, QueryResponse};
use crate::error::Result;

/// Capacity of the channel between tasks and the UI loop.
pub const CHANNEL_CAPACITY: usize = 32;

/// Outcome of a background request.
#[derive(Debug)]
pub enum ApiMessage {
    /// A database summary fetch finished.
    DbInfo {
        seq: RequestSeq,
        result: Result<DbInfo>,
    },
    /// A submitted question finished.
    Query {
        seq: RequestSeq,
        result: Result<QueryResponse>,
    },
}

/// Spawns request tasks against an explorer API.
#[derive(Clone)]
pub struct TaskSpawner {
    api: Arc<dyn ExplorerApi>,
    tx: mpsc::Sender<ApiMessage>,
    cancel: CancellationToken,
}

impl TaskSpawner {
    /// Creates a spawner and the receiving end of its channel.
    pub fn new(api: Arc<dyn ExplorerApi>) -> (Self, mpsc::Receiver<ApiMessage>) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let spawner = Self {
            api,
            tx,
            cancel: CancellationToken::new(),
        };
        (spawner, rx)
    }

    /// Starts whatever request an action asks for.
    pub fn dispatch(&self, action: Action) {
        match action {
            Action::FetchInfo(seq) => self.spawn_db_info(seq),
            Action::Submit(submission) => self.spawn_query(submission),
            Action::None | Action::Quit => {}
        }
    }

    /// Fetches the database summary.
    pub fn spawn_db_info(&self, seq: RequestSeq) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Database info fetch {} cancelled", seq);
                }
                result = api.db_info() => {
                    let _ = tx.send(ApiMessage::DbInfo { seq, result }).await;
                }
            }
        });
    }

    /// Sends a question.
    pub fn spawn_query(&self, submission: Submission) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let cancel = self.cancel.clone();
        let Submission { seq, question } = submission;

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Query {} cancelled", seq);
                }
                result = api.query(&question) => {
                    let _ = tx.send(ApiMessage::Query { seq, result }).await;
                }
            }
        });
    }

    /// Cancels every in-flight task; their outcomes are never delivered.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
