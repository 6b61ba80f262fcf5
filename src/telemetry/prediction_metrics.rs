use serde_json::Value;
use tracing::debug;

/// Outcome fields recovered from a JSON response body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionMetrics {
    pub prediction: Option<String>,
    pub probability: Option<f64>,
    pub error: Option<String>,
}

pub fn extract_prediction_metrics(response_body: &Value) -> PredictionMetrics {
    let metrics = PredictionMetrics {
        prediction: response_body
            .get("prediction")
            .and_then(Value::as_str)
            .map(str::to_string),
        probability: response_body.get("probability").and_then(Value::as_f64),
        error: response_body
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string),
    };
    debug!("Extracted prediction metrics: {:?}", metrics);
    metrics
}
