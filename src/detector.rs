use crate::{
    features::ScoredRequest,
    model::{ModelError, ProbabilityModel},
};
use serde::Serialize;
use std::{fmt, sync::Arc};
use tracing::debug;

/// Probabilities strictly above this are attacks.
pub const DECISION_THRESHOLD: f64 = 0.86;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Label {
    Attack,
    Normal,
}

impl Label {
    pub fn from_probability(probability: f64) -> Self {
        if probability > DECISION_THRESHOLD {
            Label::Attack
        } else {
            Label::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Attack => "Attack",
            Label::Normal => "Normal",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    #[serde(rename = "prediction")]
    pub label: Label,
    pub probability: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Wraps the loaded model with the fixed decision threshold.
#[derive(Clone)]
pub struct Detector {
    model: Arc<dyn ProbabilityModel>,
}

impl Detector {
    pub fn new(model: Arc<dyn ProbabilityModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn classify_text(&self, text: &str) -> Result<Verdict, ModelError> {
        let probability = self.model.predict_proba(text)?;
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ModelError::InvalidProbability(probability));
        }

        Ok(Verdict {
            label: Label::from_probability(probability),
            probability,
        })
    }

    pub fn classify(&self, request: &ScoredRequest) -> Result<Verdict, DetectionError> {
        let text = request.to_feature_text()?;
        debug!(
            model = self.model.name(),
            text_len = text.len(),
            "Serialized request for scoring"
        );
        Ok(self.classify_text(&text)?)
    }
}
