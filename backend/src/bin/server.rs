//! MAUDE trends HTTP server binary.
//!
//! Loads configuration, connects to the openFDA count API and serves the
//! dashboard datasets.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin maude-server
//!
//! # With an API key and a custom port
//! OPEN_FDA_API_KEY=... PORT=3000 cargo run --bin maude-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `OPEN_FDA_API_KEY`: API key appended to upstream queries
//! - `OPEN_FDA_BASE_URL`: Override for the upstream base URL
//! - `RUST_LOG`: Log filter (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use maude_trends::config::AppConfig;
use maude_trends::http::{create_router, AppState};
use maude_trends::upstream::{ReportSource, OpenFdaClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting MAUDE trends server");

    let config = AppConfig::load()?;
    let client = OpenFdaClient::new(config.upstream.clone())?;
    let source = Arc::new(client) as Arc<dyn ReportSource>;

    let addr: SocketAddr = config.bind_address().parse()?;
    let state = AppState::new(source, config);
    let app = create_router(state);

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
