//! Query dispatch
//!
//! Turns a raw query string into at most one backend call and one wholesale
//! result-state replacement. No retries, no timeout policy beyond the
//! transport default, no cancellation of an in-flight request when a newer
//! query arrives; overlap is resolved at commit time by the store.

use std::sync::Arc;

use crate::core::projector;
use crate::core::store::ResultStore;
use crate::error::WebServerResult;
use crate::traits::AnalysisBackend;
use shared::AnalysisResult;

/// What a submission produced
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// Empty/whitespace query: no backend call, no state change
    Ignored,
    /// Result validated, projected, and installed
    Completed(Arc<AnalysisResult>),
    /// A newer query was issued while this one was in flight; its result was
    /// discarded at commit
    Superseded,
}

/// Dispatches queries against the injected backend client
pub struct QueryDispatcher<B: AnalysisBackend> {
    backend: B,
    store: Arc<ResultStore>,
}

impl<B: AnalysisBackend> QueryDispatcher<B> {
    pub fn new(backend: B, store: Arc<ResultStore>) -> Self {
        Self { backend, store }
    }

    pub fn store(&self) -> &Arc<ResultStore> {
        &self.store
    }

    /// Submit one query end to end: trim, call, validate, project, commit.
    ///
    /// On backend failure or payload rejection the cleared state is kept and
    /// the error is returned for the caller to surface.
    pub async fn submit(&self, raw: &str) -> WebServerResult<DispatchOutcome> {
        let query = raw.trim();
        if query.is_empty() {
            tracing::debug!("ignoring empty query submission");
            return Ok(DispatchOutcome::Ignored);
        }

        let ticket = self.store.begin().await;
        tracing::info!(
            request_id = %ticket.request_id,
            seq = ticket.seq,
            "📨 Dispatching analysis query: '{}'",
            query
        );

        let response = match self.backend.analyze(query).await {
            Ok(response) => response,
            Err(e) => {
                self.store.abandon(&ticket).await;
                shared::logging::log_error("Analysis query", &e);
                return Err(e);
            }
        };

        if let Err(e) = response.validate() {
            self.store.abandon(&ticket).await;
            shared::logging::log_error("Payload validation", &e);
            return Err(e.into());
        }

        let result = Arc::new(projector::project(response));

        if self.store.commit(&ticket, result.clone()).await {
            tracing::info!(
                request_id = %ticket.request_id,
                "✅ Query completed: {} area(s), {} row(s)",
                result.area_names().len(),
                result.row_count()
            );
            Ok(DispatchOutcome::Completed(result))
        } else {
            tracing::info!(
                request_id = %ticket.request_id,
                seq = ticket.seq,
                "⏭️ Response superseded by a newer query"
            );
            Ok(DispatchOutcome::Superseded)
        }
    }
}
