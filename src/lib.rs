//! HTTP service that scores serialized HTTP requests with a pre-trained
//! attack classifier.
//!
//! `POST /predict` takes `{"method", "url", "headers", "body"}`, flattens it
//! into the text the vectorizer was fitted on and answers with
//! `{"prediction": "Attack" | "Normal", "probability": p}`.

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::{sync::Arc, time::Duration};
use tower_http::cors::{Any, CorsLayer};

pub mod auth;
pub mod config;
pub mod context;
pub mod detector;
pub mod error;
pub mod features;
pub mod handlers;
pub mod model;
pub mod telemetry;

pub use crate::{
    config::AppConfig,
    context::AppState,
    detector::{Detector, Label, Verdict, DECISION_THRESHOLD},
    error::AppError,
    features::ScoredRequest,
    model::{ModelError, ProbabilityModel},
    telemetry::MetricsRegistry,
};

/// Builds the application router around an already loaded model.
pub fn build_router(state: AppState, registry: Arc<MetricsRegistry>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let body_limit = DefaultBodyLimit::max(state.max_body_bytes);

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health_check))
        .route("/predict", post(handlers::predict))
        .layer(body_limit)
        .layer(from_fn_with_state(registry, telemetry::metrics_middleware))
        .with_state(state)
        .layer(cors)
}
