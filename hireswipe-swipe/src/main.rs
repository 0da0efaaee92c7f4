use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use hireswipe_shared::clients::db::create_pool;
use hireswipe_shared::clients::rabbitmq::RabbitMQClient;
use hireswipe_shared::middleware::{init_metrics, init_tracing};
use hireswipe_swipe::config::AppConfig;
use hireswipe_swipe::engine::SwipeEngine;
use hireswipe_swipe::store::postgres::{PgStoreSettings, PgSwipeStore};
use hireswipe_swipe::{app_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("hireswipe-swipe");

    let config = AppConfig::load()?;
    let port = config.port;

    let pool = create_pool(
        &config.database_url,
        config.db_pool_size,
        Duration::from_millis(config.request_timeout_ms.max(1)),
    )?;
    let store = PgSwipeStore::new(
        pool,
        PgStoreSettings {
            statement_timeout_ms: config.statement_timeout_ms,
            max_tx_retries: config.max_tx_retries,
        },
    );

    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;
    let metrics = init_metrics()?;

    let state = Arc::new(AppState {
        engine: SwipeEngine::new(Arc::new(store)),
        config,
        events: Arc::new(rabbitmq),
        metrics,
    });

    let app = app_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "hireswipe-swipe starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
