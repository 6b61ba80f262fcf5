use super::metrics::MetricsRegistry;
use super::prediction_metrics::{extract_prediction_metrics, PredictionMetrics};
use super::RequestMetrics;
use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header::CONTENT_LENGTH, HeaderValue, Request, Response},
    middleware::Next,
};
use std::{sync::Arc, time::Instant};
use tracing::{debug, error, info_span, Instrument};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn metrics_middleware(
    State(registry): State<Arc<MetricsRegistry>>,
    req: Request<Body>,
    next: Next,
) -> Response<Body> {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let path = req.uri().path().to_string();
    let method = req.method().to_string();
    // The body is left untouched so the handler's size cap still applies.
    let req_size = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    debug!(
        request_id = %request_id,
        "Received request: path={}, method={}, size={}",
        path, method, req_size
    );

    let span = info_span!("request", request_id = %request_id, method = %method, path = %path);
    let response = next.run(req).instrument(span).await;

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(request_id = %request_id, "Failed to read response body: {}", e);
            Default::default()
        }
    };
    let resp_size = bytes.len();

    let is_json = parts
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false);

    let outcome = if is_json {
        serde_json::from_slice(&bytes)
            .map(|json| extract_prediction_metrics(&json))
            .unwrap_or_default()
    } else {
        PredictionMetrics::default()
    };

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        parts.headers.insert(REQUEST_ID_HEADER, value);
    }

    let metrics = RequestMetrics {
        request_id,
        path,
        method,
        total_latency: start.elapsed(),
        request_size: req_size,
        response_size: resp_size,
        status_code: parts.status.as_u16(),
        prediction: outcome.prediction,
        probability: outcome.probability,
        error_type: outcome.error,
        ..Default::default()
    };

    debug!(
        request_id = %metrics.request_id,
        status = metrics.status_code,
        latency_ms = metrics.total_latency.as_secs_f64() * 1000.0,
        "Request completed"
    );
    registry.record_metrics(metrics).await;

    Response::from_parts(parts, Body::from(bytes))
}
