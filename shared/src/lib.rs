//! Shared domain types for the locality analysis web client
//!
//! Contains the wire-payload schema for the remote analysis backend, the
//! projected result model the webserver renders and exports, and the
//! error/logging plumbing used across the workspace. No I/O lives here.

pub mod errors;
pub mod logging;
pub mod model;
pub mod payload;

pub use errors::*;

// Re-export the wire schema and the projected model
pub use payload::{AnalysisRequest, AnalysisResponse, ChartSeries, RawRow, ResponseMeta, columns};

pub use model::{AnalysisResult, AreaGroup, ChartPoint, MappedRow, ResultView};
