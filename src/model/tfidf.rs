use super::{ModelError, SparseVector, Vectorizer};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Analyzer {
    #[default]
    Word,
    Char,
    CharWb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Norm {
    #[default]
    L2,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_true() -> bool {
    true
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Exported state of a fitted TF-IDF vectorizer.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfVectorizer {
    #[serde(default)]
    pub analyzer: Analyzer,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn validate(&self) -> Result<(), ModelError> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::InvalidArtifact(format!(
                "ngram_range ({}, {}) must satisfy 1 <= min <= max",
                min_n, max_n
            )));
        }

        if let Some((term, &index)) = self
            .vocabulary
            .iter()
            .find(|(_, &index)| index >= self.idf.len())
        {
            return Err(ModelError::InvalidArtifact(format!(
                "vocabulary term {:?} maps to column {} but only {} idf weights exist",
                term,
                index,
                self.idf.len()
            )));
        }

        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::InvalidArtifact(
                "idf weights must be finite".to_string(),
            ));
        }

        Ok(())
    }

    fn preprocess(&self, text: &str) -> String {
        if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        }
    }

    /// Feeds every n-gram of `text` to `emit`.
    fn analyze(&self, text: &str, emit: &mut dyn FnMut(&str)) {
        let text = self.preprocess(text);
        let (min_n, max_n) = self.ngram_range;

        match self.analyzer {
            Analyzer::Word => {
                let tokens = word_tokens(&text);
                let mut gram = String::new();
                for n in min_n..=max_n {
                    for window in tokens.windows(n) {
                        gram.clear();
                        for (i, token) in window.iter().enumerate() {
                            if i > 0 {
                                gram.push(' ');
                            }
                            gram.push_str(token);
                        }
                        emit(&gram);
                    }
                }
            }
            Analyzer::Char => {
                let chars: Vec<char> = collapse_whitespace(&text).chars().collect();
                char_ngrams(&chars, min_n, max_n, emit);
            }
            Analyzer::CharWb => {
                for word in text.split_whitespace() {
                    let mut padded = Vec::with_capacity(word.len() + 2);
                    padded.push(' ');
                    padded.extend(word.chars());
                    padded.push(' ');
                    for n in min_n..=max_n {
                        if padded.len() <= n {
                            // A word no longer than n counts once, whole.
                            emit(&padded.iter().collect::<String>());
                            break;
                        }
                        char_ngrams(&padded, n, n, emit);
                    }
                }
            }
        }
    }
}

impl Vectorizer for TfidfVectorizer {
    fn dimension(&self) -> usize {
        self.idf.len()
    }

    fn transform(&self, text: &str) -> Result<SparseVector, ModelError> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        self.analyze(text, &mut |gram| {
            if let Some(&index) = self.vocabulary.get(gram) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        });

        let mut entries = Vec::with_capacity(counts.len());
        for (index, tf) in counts {
            let idf = *self.idf.get(index).ok_or(ModelError::FeatureOutOfRange {
                index,
                dimension: self.idf.len(),
            })?;
            let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
            entries.push((index, tf * idf));
        }

        if self.norm == Some(Norm::L2) {
            let length = entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            if length > 0.0 {
                for (_, v) in entries.iter_mut() {
                    *v /= length;
                }
            }
        }

        Ok(SparseVector::new(self.dimension(), entries))
    }
}

/// Runs of two or more word characters.
fn word_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut len = 0;

    for (idx, ch) in text.char_indices() {
        if ch.is_alphanumeric() || ch == '_' {
            if start.is_none() {
                start = Some(idx);
                len = 0;
            }
            len += 1;
        } else if let Some(s) = start.take() {
            if len >= 2 {
                tokens.push(&text[s..idx]);
            }
        }
    }
    if let Some(s) = start {
        if len >= 2 {
            tokens.push(&text[s..]);
        }
    }
    tokens
}

/// Runs of two or more whitespace characters become a single space.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch.is_whitespace() && chars.peek().is_some_and(|next| next.is_whitespace()) {
            while chars.peek().is_some_and(|next| next.is_whitespace()) {
                chars.next();
            }
            out.push(' ');
        } else {
            out.push(ch);
        }
    }
    out
}

fn char_ngrams(chars: &[char], min_n: usize, max_n: usize, emit: &mut dyn FnMut(&str)) {
    let mut gram = String::new();
    for n in min_n..=max_n {
        for window in chars.windows(n) {
            gram.clear();
            gram.extend(window.iter());
            emit(&gram);
        }
    }
}
