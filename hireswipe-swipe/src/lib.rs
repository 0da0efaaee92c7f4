use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;

use hireswipe_shared::middleware::{metrics_middleware, JwtSecret};

pub mod config;
pub mod engine;
pub mod events;
pub mod models;
pub mod routes;
pub mod schema;
pub mod store;

use config::AppConfig;
use engine::SwipeEngine;
use events::EventSink;
use store::SwipeStore;

pub struct AppState<S> {
    pub engine: SwipeEngine<S>,
    pub config: AppConfig,
    pub events: Arc<dyn EventSink>,
    pub metrics: PrometheusHandle,
}

impl<S> JwtSecret for AppState<S> {
    fn jwt_secret(&self) -> &str {
        &self.config.jwt_secret
    }
}

pub fn app_router<S: SwipeStore>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        // Health
        .route("/health", get(routes::health::health_check::<S>))
        .route("/metrics", get(routes::health::metrics::<S>))
        // Employer side
        .route("/candidates", get(routes::candidates::list_candidates::<S>))
        .route("/swipe", post(routes::swipes::record_swipe::<S>))
        .route("/liked", get(routes::swipes::list_liked::<S>))
        // Applicant side
        .route("/applicant/swipe", post(routes::swipes::record_applicant_swipe::<S>))
        .route("/applicant/likes", get(routes::swipes::list_likes_received::<S>))
        // Either party
        .route("/matches", get(routes::matches::list_matches::<S>))
        .route("/matches/:id", delete(routes::matches::deactivate_match::<S>))
        .layer(axum::middleware::from_fn(metrics_middleware))
        .with_state(state)
}
