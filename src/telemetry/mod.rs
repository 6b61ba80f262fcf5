pub mod exporters;
pub mod metrics;
pub mod middleware;
pub mod plugins;
pub mod prediction_metrics;

pub use self::{
    exporters::prometheus::PrometheusExporter,
    metrics::{MetricsExporter, MetricsRegistry},
    middleware::{metrics_middleware, REQUEST_ID_HEADER},
    plugins::ConsolePlugin,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMetrics {
    // Request metadata
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub path: String,
    pub method: String,

    // Timing metrics
    pub total_latency: Duration,

    // Size metrics
    pub request_size: usize,
    pub response_size: usize,

    // Outcome
    pub status_code: u16,
    pub prediction: Option<String>,
    pub probability: Option<f64>,
    pub error_type: Option<String>,
}

impl Default for RequestMetrics {
    fn default() -> Self {
        Self {
            request_id: String::new(),
            timestamp: Utc::now(),
            path: String::new(),
            method: String::new(),
            total_latency: Duration::default(),
            request_size: 0,
            response_size: 0,
            status_code: 0,
            prediction: None,
            probability: None,
            error_type: None,
        }
    }
}
