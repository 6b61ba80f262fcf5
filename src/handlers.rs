use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, State},
    http::{header::CONTENT_TYPE, HeaderMap, Request, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::{
    auth::authorize, context::AppState, detector::Verdict, error::AppError,
    features::ScoredRequest,
};

const WELCOME_PAGE: &str = "<h1>Welcome to the AI Firewall API \u{1f680}</h1>\
<p>Use the /predict endpoint to classify requests.</p>";

pub async fn home() -> Html<&'static str> {
    Html(WELCOME_PAGE)
}

pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn predict(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Json<Verdict>, AppError> {
    authorize(request.headers(), &state.api_token)?;

    if !is_json(request.headers()) {
        return Err(AppError::NotJson);
    }

    let body = Bytes::from_request(request, &state)
        .await
        .map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge
            } else {
                AppError::Body(rejection.body_text())
            }
        })?;

    let payload: Value = serde_json::from_slice(&body).map_err(|_| AppError::NotJson)?;
    let scored = ScoredRequest::from_payload(payload).map_err(AppError::InvalidRequest)?;

    let verdict = state.detector.classify(&scored)?;
    info!(
        method = %scored.method,
        url = %scored.url,
        prediction = %verdict.label,
        probability = verdict.probability,
        model = state.detector.model_name(),
        "Scored request"
    );

    Ok(Json(verdict))
}

/// `application/json` or any `application/*+json` media type.
fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json"
        || (mime.starts_with("application/") && mime.ends_with("+json"))
}
