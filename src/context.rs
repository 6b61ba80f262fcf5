use std::sync::Arc;

use crate::{config::DEFAULT_MAX_BODY_BYTES, detector::Detector, model::ProbabilityModel};

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub detector: Detector,
    pub api_token: Arc<str>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(model: Arc<dyn ProbabilityModel>, api_token: impl Into<Arc<str>>) -> Self {
        Self {
            detector: Detector::new(model),
            api_token: api_token.into(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}
