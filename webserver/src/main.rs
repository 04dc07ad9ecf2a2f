//! WebServer entry point
//!
//! Serves the analysis page and proxies queries to the remote analysis
//! backend configured by flag, environment, or the production fallback.

use clap::Parser;
use std::net::SocketAddr;

use webserver::{
    RealAnalysisBackend, RealStaticFileServer, WebServer, WebServerResult, WebServerState, config,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "webserver")]
#[command(about = "Locality analysis web client")]
struct Args {
    /// Port for the HTTP server (browser connections)
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Static files directory
    #[arg(long, default_value = "./static")]
    static_dir: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Analysis backend base URL; falls back to REALESTATE_BACKEND_URL, then
    /// the production default
    #[arg(long)]
    backend_url: Option<String>,
}

#[tokio::main]
async fn main() -> WebServerResult<()> {
    // Load .env before parsing so the backend URL fallback can see it
    dotenvy::dotenv().ok();

    let args = Args::parse();
    shared::logging::init(Some(&args.log_level));

    let backend_url = config::resolve_backend_url(args.backend_url.as_deref());
    shared::logging::log_startup(&format!("webserver on port {} → {}", args.port, backend_url));

    let bind_address: SocketAddr = format!("127.0.0.1:{}", args.port)
        .parse()
        .map_err(|e| webserver::WebServerError::config(format!("Invalid port: {e}")))?;

    // Wire services with dependency injection
    let backend = RealAnalysisBackend::new(reqwest::Client::new(), &backend_url);
    let static_files = RealStaticFileServer::new(&args.static_dir);
    let state = WebServerState::new(backend_url);

    let server = WebServer::new(state, backend, static_files);
    server.run(bind_address).await?;

    shared::logging::log_success("WebServer stopped gracefully");
    Ok(())
}
