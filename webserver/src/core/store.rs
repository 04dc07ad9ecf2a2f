//! Result-state ownership
//!
//! The store is the single owner of the per-query result. State is replaced
//! wholesale: a new query clears the previous result up front and installs
//! its own only if no newer query has been issued since. That gives
//! last-issued-wins when submissions overlap, and the UI can never observe a
//! mix of two queries' results.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use shared::AnalysisResult;

/// Handle identifying one issued query
///
/// `seq` decides commit eligibility; `request_id` exists for log correlation
/// only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub seq: u64,
    pub request_id: Uuid,
}

#[derive(Debug, Default)]
struct StoreInner {
    latest_seq: u64,
    result: Option<Arc<AnalysisResult>>,
}

/// Single owner of the current analysis result
#[derive(Debug, Default)]
pub struct ResultStore {
    inner: RwLock<StoreInner>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new query: bump the sequence and clear any stored result so
    /// the UI shows the empty state while the call is in flight.
    pub async fn begin(&self) -> QueryTicket {
        let mut inner = self.inner.write().await;
        inner.latest_seq += 1;
        inner.result = None;

        QueryTicket {
            seq: inner.latest_seq,
            request_id: Uuid::new_v4(),
        }
    }

    /// Install a result for `ticket`. Returns false and discards the result
    /// when a newer query has been issued since the ticket was taken.
    pub async fn commit(&self, ticket: &QueryTicket, result: Arc<AnalysisResult>) -> bool {
        let mut inner = self.inner.write().await;
        if ticket.seq != inner.latest_seq {
            return false;
        }

        inner.result = Some(result);
        true
    }

    /// Failure path: keep the cleared state for `ticket`, touching nothing if
    /// a newer query owns the store by now.
    pub async fn abandon(&self, ticket: &QueryTicket) {
        let mut inner = self.inner.write().await;
        if ticket.seq == inner.latest_seq {
            inner.result = None;
        }
    }

    /// Snapshot of the current result for rendering and export
    pub async fn current(&self) -> Option<Arc<AnalysisResult>> {
        self.inner.read().await.result.clone()
    }
}
