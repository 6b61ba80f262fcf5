use super::common::{json_body, TestGateway};
use serde_json::json;
use std::{path::PathBuf, sync::Arc};
use test_log::test;
use waf_inference_gateway::model::{load_pipeline, ModelError, Pipeline, ProbabilityModel};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_pipeline() -> Pipeline {
    load_pipeline(fixture("waf_vectorizer.json"), fixture("waf_model.json"))
        .expect("Failed to load fixture artifacts")
}

#[test]
fn test_fixture_artifacts_load() {
    let pipeline = fixture_pipeline();
    assert_eq!(pipeline.name(), "waf_model");

    let p = pipeline
        .predict_proba("GET /item?id=1 UNION SELECT password  {}")
        .unwrap();
    // 3 in-vocabulary terms, l2-normalized: -1 + (4 + 4 - 1) / sqrt(3)
    let expected = 1.0 / (1.0 + (-(-1.0 + 7.0 / 3f64.sqrt())).exp());
    assert!((p - expected).abs() < 1e-12, "got {p}, expected {expected}");
}

#[test]
fn test_missing_artifact_is_an_error() {
    let err = load_pipeline(fixture("missing.json"), fixture("waf_model.json"))
        .err()
        .expect("loading a missing artifact should fail");
    assert!(matches!(err, ModelError::Read { .. }));
}

#[test(tokio::test)]
async fn test_end_to_end_with_fixture_artifacts() {
    let gateway = TestGateway::start(Arc::new(fixture_pipeline())).await;

    let attack = json_body(
        gateway
            .predict(&json!({
                "method": "GET",
                "url": "/item?id=1 UNION SELECT password",
                "headers": {},
                "body": {}
            }))
            .await,
    )
    .await;
    assert_eq!(attack["prediction"], "Attack");
    assert!(attack["probability"].as_f64().unwrap() > 0.86);

    let normal = json_body(
        gateway
            .predict(&json!({
                "method": "GET",
                "url": "/index.html",
                "headers": {"User-Agent": "Mozilla/5.0"},
                "body": {}
            }))
            .await,
    )
    .await;
    assert_eq!(normal["prediction"], "Normal");
    assert!(normal["probability"].as_f64().unwrap() < 0.1);
}
