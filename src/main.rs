use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docscan::{config::Config, models::AppState, routes::create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docscan=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration (key values never reach the log, only lengths)
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);
    info!(
        "OpenAI API key configured: {}",
        !config.keys.openai_api_key.is_empty()
    );
    info!(
        "ImgBB API key configured: {}",
        !config.keys.imgbb_api_key.is_empty()
    );
    info!(
        "Temporary files directory: {}",
        config.scratch.dir.display()
    );

    // Create shared state and make sure the scratch directory exists
    let state = AppState::new(config.clone());
    state
        .scratch
        .ensure()
        .map_err(|e| anyhow::anyhow!("Failed to create scratch directory: {}", e))?;

    // Create router
    let app = create_router(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
