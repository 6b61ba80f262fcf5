use dotenv::dotenv;
use std::{env, path::PathBuf, str::FromStr};

/// Flask-compatible default cap on inbound payloads.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub api_token: String,
    pub vectorizer_path: PathBuf,
    pub model_path: PathBuf,
    pub max_body_bytes: usize,
    pub worker_threads: usize,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    /// Dump every request record to stdout.
    pub debug_mode: bool,
    /// Forward request records to the `metrics` facade.
    pub metrics_enabled: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let api_token = match env::var("API_TOKEN") {
            Ok(token) if !token.is_empty() => token,
            _ => return Err(ConfigError::Missing("API_TOKEN")),
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 8000)?,
            api_token,
            vectorizer_path: env::var("VECTORIZER_PATH")
                .unwrap_or_else(|_| "models/waf_vectorizer.json".to_string())
                .into(),
            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "models/waf_model.json".to_string())
                .into(),
            max_body_bytes: parse_var("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
            worker_threads: parse_var("WORKER_THREADS", num_cpus::get())?,
            telemetry: TelemetryConfig::from_env()?,
        })
    }
}

impl TelemetryConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            debug_mode: parse_flag("DEBUG_MODE")?,
            metrics_enabled: parse_flag("ENABLE_METRICS")?,
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(name: &'static str) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ConfigError::Invalid { name, value }),
        },
        Err(_) => Ok(false),
    }
}
