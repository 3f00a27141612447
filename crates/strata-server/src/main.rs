use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use strata_client::ReqwestFetcher;
use strata_core::ScrapeConfig;
use strata_server::routes;
use strata_server::state::AppState;

const MAX_BODY_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("strata=info".parse()?))
        .with_target(false)
        .init();

    let port = std::env::var("STRATA_SERVER_PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");

    let config = ScrapeConfig::from_env()?;
    let fetcher = ReqwestFetcher::from_config(&config.fetch)?;

    #[cfg(feature = "browser")]
    let renderer = strata_client::ChromiumRenderer::with_config(config.render.clone());
    #[cfg(not(feature = "browser"))]
    let renderer = {
        tracing::warn!("Built without the `browser` feature; rendered fetches will fail");
        strata_core::NoopRenderer
    };

    let state = Arc::new(AppState::new(fetcher, renderer));

    let app = routes::router(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
