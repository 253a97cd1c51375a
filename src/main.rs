use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lead_scoring_api::config::Config;
use lead_scoring_api::handlers::AppState;
use lead_scoring_api::routes::build_router;

/// Main entry point for the application.
///
/// Initializes tracing and configuration, then starts the Axum server. Lead
/// data is not touched at startup; each request reads the CSV file itself.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_scoring_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    if !config.data_path.exists() {
        tracing::warn!(
            "Lead data file {} does not exist yet; /api/leads will return []",
            config.data_path.display()
        );
    }

    let app_state = Arc::new(AppState::new(config.clone()));
    let app = build_router(app_state);

    // Start server
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
