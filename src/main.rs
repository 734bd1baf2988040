use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parrot_relay::{
    api::routes::{health_routes, metrics_routes, relay_routes},
    blockchain::client::ParrotClient,
    config::Config,
    metrics::RelayMetrics,
    relay::engine::RelayEngine,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parrot_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the node client and relay engine
    let client = ParrotClient::new(&config)?;
    let metrics = RelayMetrics::new()?;
    let engine = RelayEngine::new(Arc::new(client), &config, metrics.clone())?;

    tracing::info!(
        contract = %engine.contract_address_hex(),
        chain_id = config.blockchain.chain_id,
        rpc_url = %config.blockchain.rpc_url,
        "Relay targeting Parrot Protocol contract"
    );

    // Create application state
    let app_state = AppState {
        config: config.clone(),
        engine,
        metrics,
    };

    // Build application routes; the static UI is served for anything
    // the relay endpoints don't claim
    let app = Router::new()
        .merge(relay_routes())
        .nest("/api/health", health_routes())
        .nest("/metrics", metrics_routes())
        .fallback_service(ServeDir::new(&config.ui.static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("🦜 Parrot relay starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
