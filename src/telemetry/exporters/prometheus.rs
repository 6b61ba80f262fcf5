use crate::telemetry::{metrics::MetricsExporter, RequestMetrics};
use async_trait::async_trait;
use metrics::{counter, gauge, histogram};

/// Forwards request records to whatever recorder is installed behind the
/// `metrics` facade.
pub struct PrometheusExporter {
    namespace: String,
}

impl PrometheusExporter {
    pub fn new(namespace: String) -> Self {
        Self { namespace }
    }
}

#[async_trait]
impl MetricsExporter for PrometheusExporter {
    async fn export_metrics(
        &self,
        metrics: RequestMetrics,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let labels = [
            ("path", metrics.path.clone()),
            ("method", metrics.method.clone()),
            ("status", metrics.status_code.to_string()),
        ];

        // Record latency metrics
        let name = format!("{}_request_latency", self.namespace);
        histogram!(name, &labels).record(metrics.total_latency.as_secs_f64());

        // Record size metrics
        let name = format!("{}_request_size", self.namespace);
        gauge!(name, &labels).set(metrics.request_size as f64);

        let name = format!("{}_response_size", self.namespace);
        gauge!(name, &labels).set(metrics.response_size as f64);

        // Record prediction metrics
        if let Some(prediction) = metrics.prediction {
            let name = format!("{}_predictions_total", self.namespace);
            counter!(name, "prediction" => prediction).increment(1);
        }

        if let Some(probability) = metrics.probability {
            let name = format!("{}_attack_probability", self.namespace);
            histogram!(name).record(probability);
        }

        // Record error metrics
        if metrics.error_type.is_some() {
            let name = format!("{}_error_count", self.namespace);
            counter!(name, &labels).increment(1);
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "prometheus"
    }
}
