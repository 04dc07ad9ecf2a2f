//! Shared error types for the analysis client workspace

use thiserror::Error;

/// Rejections raised while validating a backend payload before projection
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayloadError {
    #[error("chart series lengths disagree: years={years}, price={price}, demand={demand}")]
    ChartLengthMismatch { years: usize, price: usize, demand: usize },
}

/// Failures of the remote analysis backend call
#[derive(Error, Debug, Clone)]
pub enum BackendFailure {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

pub type SharedResult<T> = Result<T, PayloadError>;
