//! Static file serving service
//!
//! Serves the analysis page and its assets with content types and cache
//! headers. The page is presentational chrome only; every behavior it shows
//! comes from the JSON and file endpoints.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{WebServerError, WebServerResult};
use crate::traits::{StaticFileResponse, StaticFileServer};

/// Real static file server implementation
#[derive(Clone)]
pub struct RealStaticFileServer {
    base_dir: PathBuf,
    mime_types: HashMap<String, String>,
}

impl RealStaticFileServer {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        let mut mime_types = HashMap::new();
        mime_types.insert("html".to_string(), "text/html; charset=utf-8".to_string());
        mime_types.insert("css".to_string(), "text/css".to_string());
        mime_types.insert("js".to_string(), "application/javascript".to_string());
        mime_types.insert("json".to_string(), "application/json".to_string());
        mime_types.insert("svg".to_string(), "image/svg+xml".to_string());
        mime_types.insert("png".to_string(), "image/png".to_string());
        mime_types.insert("ico".to_string(), "image/x-icon".to_string());

        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            mime_types,
        }
    }

    fn mime_type(&self, path: &str) -> String {
        Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.mime_types.get(&ext.to_lowercase()))
            .cloned()
            .unwrap_or_else(|| "application/octet-stream".to_string())
    }

    fn cache_control(&self, path: &str) -> Option<String> {
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some("html") => Some("no-cache".to_string()),
            Some("js") | Some("css") => Some("public, max-age=3600".to_string()),
            Some("svg") | Some("png") | Some("ico") => Some("public, max-age=86400".to_string()),
            _ => None,
        }
    }

    /// Resolve a request path inside the base directory, rejecting traversal
    fn resolve_path(&self, request_path: &str) -> WebServerResult<PathBuf> {
        let clean_path = request_path.trim_start_matches('/');
        let file_path = if clean_path.is_empty() { "index.html" } else { clean_path };

        let full_path = self.base_dir.join(file_path);

        let canonical_path = full_path
            .canonicalize()
            .map_err(|_| WebServerError::StaticFileNotFound {
                path: request_path.to_string(),
            })?;

        let canonical_base = self.base_dir.canonicalize().map_err(|_| {
            WebServerError::StaticFileError {
                path: self.base_dir.display().to_string(),
            }
        })?;

        if !canonical_path.starts_with(&canonical_base) {
            return Err(WebServerError::StaticFileNotFound {
                path: request_path.to_string(),
            });
        }

        Ok(canonical_path)
    }
}

#[async_trait]
impl StaticFileServer for RealStaticFileServer {
    async fn serve_file(&self, path: &str) -> WebServerResult<StaticFileResponse> {
        let file_path = self.resolve_path(path)?;

        if file_path.is_dir() {
            return Err(WebServerError::StaticFileNotFound {
                path: path.to_string(),
            });
        }

        let content = fs::read(&file_path).await.map_err(|e| {
            tracing::warn!("failed to read static file {}: {}", path, e);
            WebServerError::StaticFileNotFound {
                path: path.to_string(),
            }
        })?;

        tracing::debug!("📄 Served static file: {} ({} bytes)", path, content.len());

        let mut response = StaticFileResponse::new(content, self.mime_type(path));
        if let Some(cache) = self.cache_control(path) {
            response = response.with_cache_control(cache);
        }
        Ok(response)
    }

    async fn file_exists(&self, path: &str) -> bool {
        match self.resolve_path(path) {
            Ok(file_path) => file_path.is_file(),
            Err(_) => false,
        }
    }
}

impl Default for RealStaticFileServer {
    fn default() -> Self {
        Self::new("./static")
    }
}
