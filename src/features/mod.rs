//! Turns a submitted request description into the single line of text the
//! vectorizer was fitted on.

mod encoding;
mod repr;

pub use encoding::{to_feature_json, FeatureJsonFormatter};
pub use repr::to_repr;

use serde::de::{Error as _, Unexpected};
use serde::Deserialize;
use serde_json::{Map, Value};

/// A request description submitted for classification.
///
/// Missing fields fall back to empty values; fields of the wrong type fail
/// to decode.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredRequest {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub url: String,
    /// Kept in document order.
    #[serde(default)]
    pub headers: Map<String, Value>,
    #[serde(default = "empty_body")]
    pub body: Value,
}

fn empty_body() -> Value {
    Value::Object(Map::new())
}

impl ScoredRequest {
    /// Decodes an inbound JSON payload. Only objects are accepted.
    pub fn from_payload(payload: Value) -> serde_json::Result<Self> {
        if payload.is_object() {
            return serde_json::from_value(payload);
        }
        let unexpected = match &payload {
            Value::Object(_) => Unexpected::Map,
            Value::Array(_) => Unexpected::Seq,
            Value::String(s) => Unexpected::Str(s),
            Value::Number(_) => Unexpected::Other("number"),
            Value::Bool(b) => Unexpected::Bool(*b),
            Value::Null => Unexpected::Unit,
        };
        Err(serde_json::Error::invalid_type(unexpected, &"a request object"))
    }

    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Map::new(),
            body: empty_body(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// `"<method> <url> <k:v k:v ...> <body-json>"`, space separated.
    pub fn to_feature_text(&self) -> serde_json::Result<String> {
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| Ok(format!("{}:{}", name, header_text(value)?)))
            .collect::<serde_json::Result<Vec<_>>>()?
            .join(" ");
        let body = to_feature_json(&self.body)?;

        Ok([self.method.as_str(), self.url.as_str(), &headers, &body].join(" "))
    }
}

/// Header values are plain text in the training data; non-string JSON values
/// are rendered in Python `str()` form.
fn header_text(value: &Value) -> serde_json::Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => to_repr(value),
    }
}
