//! Webserver process state
//!
//! Everything the HTTP surface needs that is not a service: the result store
//! (the single owner of query results), the configured backend base URL, and
//! uptime bookkeeping for the status endpoints.

use std::sync::Arc;
use std::time::Instant;

use crate::core::ResultStore;

#[derive(Debug)]
pub struct WebServerState {
    pub store: Arc<ResultStore>,
    pub backend_url: String,
    pub server_start_time: Instant,
}

impl WebServerState {
    pub fn new(backend_url: String) -> Self {
        Self {
            store: Arc::new(ResultStore::new()),
            backend_url,
            server_start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.server_start_time.elapsed().as_secs()
    }
}
