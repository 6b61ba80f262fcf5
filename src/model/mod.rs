use serde::de::DeserializeOwned;
use std::{fs, path::Path};
use tracing::{debug, info};

mod logistic;
mod tfidf;

pub use logistic::LogisticRegression;
pub use tfidf::{Analyzer, Norm, TfidfVectorizer};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model artifact {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("feature dimension mismatch: vectorizer produces {vectorizer} columns, classifier expects {classifier}")]
    DimensionMismatch { vectorizer: usize, classifier: usize },

    #[error("feature index {index} out of range for {dimension} columns")]
    FeatureOutOfRange { index: usize, dimension: usize },

    #[error("model returned an invalid probability: {0}")]
    InvalidProbability(f64),
}

/// Sparse feature vector: `(column, value)` pairs sorted by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    pub dimension: usize,
    pub entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn new(dimension: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_unstable_by_key(|(index, _)| *index);
        Self { dimension, entries }
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A fitted text -> feature vector transform.
pub trait Vectorizer: Send + Sync {
    /// Number of columns in the produced vectors
    fn dimension(&self) -> usize;

    /// Transform one document
    fn transform(&self, text: &str) -> Result<SparseVector, ModelError>;
}

/// A fitted binary classifier over feature vectors.
pub trait Classifier: Send + Sync {
    /// Number of columns the classifier was fitted on
    fn dimension(&self) -> usize;

    /// Probability of the positive (malicious) class
    fn predict_proba(&self, features: &SparseVector) -> Result<f64, ModelError>;
}

/// The capability the request scorer needs: text in, P(attack) out.
pub trait ProbabilityModel: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    fn predict_proba(&self, text: &str) -> Result<f64, ModelError>;
}

/// A vectorizer and a classifier fitted together.
pub struct Pipeline {
    name: String,
    vectorizer: Box<dyn Vectorizer>,
    classifier: Box<dyn Classifier>,
}

impl Pipeline {
    pub fn new(
        name: impl Into<String>,
        vectorizer: Box<dyn Vectorizer>,
        classifier: Box<dyn Classifier>,
    ) -> Result<Self, ModelError> {
        if vectorizer.dimension() != classifier.dimension() {
            return Err(ModelError::DimensionMismatch {
                vectorizer: vectorizer.dimension(),
                classifier: classifier.dimension(),
            });
        }

        Ok(Self {
            name: name.into(),
            vectorizer,
            classifier,
        })
    }
}

impl ProbabilityModel for Pipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict_proba(&self, text: &str) -> Result<f64, ModelError> {
        let features = self.vectorizer.transform(text)?;
        debug!(
            model = %self.name,
            non_zero = features.entries.len(),
            "Vectorized request text"
        );
        self.classifier.predict_proba(&features)
    }
}

/// Loads the TF-IDF vectorizer and logistic-regression artifacts and checks
/// they were fitted together.
pub fn load_pipeline(
    vectorizer_path: impl AsRef<Path>,
    model_path: impl AsRef<Path>,
) -> Result<Pipeline, ModelError> {
    let vectorizer_path = vectorizer_path.as_ref();
    let model_path = model_path.as_ref();

    let vectorizer: TfidfVectorizer = read_artifact(vectorizer_path)?;
    vectorizer.validate()?;
    info!(
        path = %vectorizer_path.display(),
        analyzer = ?vectorizer.analyzer,
        columns = vectorizer.dimension(),
        "Loaded vectorizer"
    );

    let classifier: LogisticRegression = read_artifact(model_path)?;
    info!(
        path = %model_path.display(),
        columns = classifier.dimension(),
        "Loaded classifier"
    );

    let name = model_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pipeline".to_string());

    Pipeline::new(name, Box::new(vectorizer), Box::new(classifier))
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let raw = fs::read(path).map_err(|source| ModelError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| ModelError::Parse {
        path: path.display().to_string(),
        source,
    })
}
