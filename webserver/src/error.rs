//! WebServer-specific error types

use shared::{BackendFailure, PayloadError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("Analysis backend failure: {0}")]
    Backend(#[from] BackendFailure),

    #[error("Rejected backend payload: {0}")]
    Payload(#[from] PayloadError),

    #[error("Export failed: {message}")]
    Export { message: String },

    #[error("Chart rendering failed: {message}")]
    Chart { message: String },

    #[error("Static file not found: {path}")]
    StaticFileNotFound { path: String },

    #[error("Static file serving error: {path}")]
    StaticFileError { path: String },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WebServerError {
    pub fn export<M: Into<String>>(message: M) -> Self {
        Self::Export { message: message.into() }
    }

    pub fn chart<M: Into<String>>(message: M) -> Self {
        Self::Chart { message: message.into() }
    }

    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config { message: message.into() }
    }
}

pub type WebServerResult<T> = Result<T, WebServerError>;
