use tracing_subscriber::EnvFilter;

use storefront_admin_api::config;
use storefront_admin_api::database::DatabaseManager;
use storefront_admin_api::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("storefront_admin_api=info,tower_http=info")),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting Storefront Admin API in {:?} mode", config.environment);
    if storefront_admin_api::is_development!() && std::env::var("JWT_SECRET").is_err() {
        tracing::info!("Signing tokens with the built-in development secret");
    } else if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; every protected request will be rejected");
    }

    let app = routes::app(config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    DatabaseManager::close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
