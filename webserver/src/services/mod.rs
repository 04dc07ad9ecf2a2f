//! Service implementations
//!
//! Real implementations of the I/O traits plus the synchronous chart/export
//! engines that read a stored result.

pub mod backend_client;
pub mod chart;
pub mod export;
pub mod static_server;

pub use backend_client::RealAnalysisBackend;
pub use export::ExportFile;
pub use static_server::RealStaticFileServer;
