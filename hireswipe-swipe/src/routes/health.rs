use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use hireswipe_shared::types::api::{HealthCheck, HealthResponse};

use super::run_engine;
use crate::store::SwipeStore;
use crate::AppState;

pub async fn health_check<S: SwipeStore>(State(state): State<Arc<AppState<S>>>) -> Json<HealthResponse> {
    let database = match run_engine(&state, |engine, _| Ok(engine.store().ping()?)).await {
        Ok(()) => HealthCheck::healthy("database"),
        Err(e) => HealthCheck::unhealthy("database", e.to_string()),
    };

    let broker = if state.events.is_connected() {
        HealthCheck::healthy("rabbitmq")
    } else {
        HealthCheck::unhealthy("rabbitmq", "channel closed")
    };

    Json(
        HealthResponse::healthy("hireswipe-swipe", env!("CARGO_PKG_VERSION"))
            .with_checks(vec![database, broker]),
    )
}

/// Prometheus text exposition.
pub async fn metrics<S: SwipeStore>(State(state): State<Arc<AppState<S>>>) -> String {
    state.metrics.render()
}
