//! PaintFlow persistence server binary.

use clap::Parser;
use paintflow_server::{AppState, ServerConfig, router};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paintflow_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::parse();
    let store = config.open_store()?;
    let app = router(AppState::new(store, config.list_limit), config.body_limit);

    let addr = config.addr();
    info!("PaintFlow server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
