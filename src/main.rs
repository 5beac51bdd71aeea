use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rust_indicator_api::config::Config;
use rust_indicator_api::evaluator::Evaluator;
use rust_indicator_api::fallback::fallback_records;
use rust_indicator_api::handlers::{self, AppState};
use rust_indicator_api::loader::{spawn_refresh_task, RosterLoader};
use rust_indicator_api::models::RosterSource;
use rust_indicator_api::roster::{RosterSnapshot, RosterStore};
use rust_indicator_api::targets::TargetTable;

/// Main entry point.
///
/// Initializes tracing and configuration, performs the first roster load,
/// starts the periodic refresh task and serves the lookup API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_indicator_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let targets = match &config.targets_path {
        Some(path) => TargetTable::from_json_file(path)?,
        None => TargetTable::default(),
    };
    tracing::info!("Target table ready");

    // Serve the built-in roster until the first load finishes
    let store = Arc::new(RosterStore::new(RosterSnapshot::from_records(
        fallback_records(),
        RosterSource::Fallback,
        None,
    )));

    let loader = Arc::new(RosterLoader::from_config(&config, store.clone())?);
    let outcome = loader.refresh().await;
    tracing::info!(
        "Initial roster loaded from {:?}: {} records",
        outcome.source,
        outcome.record_count
    );

    spawn_refresh_task(loader.clone(), config.refresh_interval);
    tracing::info!(
        "Roster refresh scheduled every {}s",
        config.refresh_interval.as_secs()
    );

    let app_state = Arc::new(AppState {
        store,
        loader,
        evaluator: Evaluator::new(targets),
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    let protected_routes = handlers::api_routes().layer(
        ServiceBuilder::new()
            .layer(RequestBodyLimitLayer::new(64 * 1024))
            .layer(GovernorLayer {
                config: governor_conf,
            }),
    );

    // Health check bypasses rate limiting
    let app = handlers::app(app_state, protected_routes);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
