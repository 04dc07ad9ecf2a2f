//! Webserver library for the locality analysis client
//!
//! Serves the single analysis page, dispatches free-text locality queries to
//! the remote analysis backend, projects responses into single or compare
//! presentation, and produces chart SVGs plus spreadsheet/document exports
//! from the stored result.

pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;
pub mod webserver_impl;

// Re-export main types
pub use error::{WebServerError, WebServerResult};
pub use state::WebServerState;
pub use webserver_impl::WebServer;

// Re-export trait definitions
pub use traits::{AnalysisBackend, StaticFileServer};

// Re-export service implementations
pub use services::{RealAnalysisBackend, RealStaticFileServer};
