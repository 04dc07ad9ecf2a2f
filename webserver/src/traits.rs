//! Service trait definitions for dependency injection
//!
//! All I/O operations are abstracted through these traits for testability

use async_trait::async_trait;

use crate::error::WebServerResult;
use shared::AnalysisResponse;

/// Remote analysis backend service trait
///
/// One call per submitted query; the implementation owns transport details
/// and maps failures into [`shared::BackendFailure`].
#[mockall::automock]
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Send a trimmed, non-empty query to the analysis endpoint
    async fn analyze(&self, query: &str) -> WebServerResult<AnalysisResponse>;
}

/// Static file serving service trait
#[mockall::automock]
#[async_trait]
pub trait StaticFileServer: Send + Sync {
    /// Serve static file
    async fn serve_file(&self, path: &str) -> WebServerResult<StaticFileResponse>;

    /// Check if file exists
    async fn file_exists(&self, path: &str) -> bool;
}

/// Static file response
#[derive(Debug, Clone)]
pub struct StaticFileResponse {
    pub content: Vec<u8>,
    pub content_type: String,
    pub cache_control: Option<String>,
}

impl StaticFileResponse {
    pub fn new(content: Vec<u8>, content_type: String) -> Self {
        Self {
            content,
            content_type,
            cache_control: None,
        }
    }

    pub fn with_cache_control(mut self, cache_control: String) -> Self {
        self.cache_control = Some(cache_control);
        self
    }
}
