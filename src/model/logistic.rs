use super::{Classifier, ModelError, SparseVector};
use serde::Deserialize;

/// Exported weights of a fitted binary logistic regression.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    pub fn decision_function(&self, features: &SparseVector) -> Result<f64, ModelError> {
        let mut score = self.intercept;
        for &(index, value) in &features.entries {
            let weight = self.coef.get(index).ok_or(ModelError::FeatureOutOfRange {
                index,
                dimension: self.coef.len(),
            })?;
            score += weight * value;
        }
        Ok(score)
    }
}

impl Classifier for LogisticRegression {
    fn dimension(&self) -> usize {
        self.coef.len()
    }

    fn predict_proba(&self, features: &SparseVector) -> Result<f64, ModelError> {
        let score = self.decision_function(features)?;
        Ok(sigmoid(score))
    }
}

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
