use super::common::{json_body, StubModel, TestGateway, TEST_TOKEN};
use serde_json::json;
use test_log::test;
use waf_inference_gateway::AppState;

fn login_request() -> serde_json::Value {
    json!({"method": "GET", "url": "/login", "headers": {"x": "1"}, "body": {}})
}

#[test(tokio::test)]
async fn test_predict_attack() {
    let model = StubModel::returning(0.9);
    let gateway = TestGateway::start(model.clone()).await;

    let response = gateway.predict(&login_request()).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        json_body(response).await,
        json!({"prediction": "Attack", "probability": 0.9})
    );
    assert_eq!(model.seen(), vec!["GET /login x:1 {}".to_string()]);
}

#[test(tokio::test)]
async fn test_predict_normal() {
    let gateway = TestGateway::start(StubModel::returning(0.5)).await;

    let response = gateway.predict(&login_request()).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        json_body(response).await,
        json!({"prediction": "Normal", "probability": 0.5})
    );
}

#[test(tokio::test)]
async fn test_threshold_boundary_is_normal() {
    let gateway = TestGateway::start(StubModel::returning(0.86)).await;

    let body = json_body(gateway.predict(&login_request()).await).await;
    assert_eq!(body["prediction"], "Normal");
    assert_eq!(body["probability"], 0.86);
}

#[test(tokio::test)]
async fn test_header_order_and_body_encoding_reach_the_model() {
    let model = StubModel::returning(0.1);
    let gateway = TestGateway::start(model.clone()).await;

    let payload = r#"{"method":"POST","url":"/search","headers":{"User-Agent":"sqlmap/1.7","Accept":"*/*"},"body":{"q":"1' UNION SELECT 1--","page":2}}"#;
    let response = gateway
        .predict_raw(Some(TEST_TOKEN), Some("application/json"), payload)
        .await;
    assert_eq!(response.status(), 200);

    assert_eq!(
        model.seen(),
        vec![
            r#"POST /search User-Agent:sqlmap/1.7 Accept:*/* {"q": "1' UNION SELECT 1--", "page": 2}"#
                .to_string()
        ]
    );
}

#[test(tokio::test)]
async fn test_missing_fields_default_to_empty() {
    let model = StubModel::returning(0.2);
    let gateway = TestGateway::start(model.clone()).await;

    let response = gateway.predict(&json!({})).await;
    assert_eq!(response.status(), 200);
    assert_eq!(model.seen(), vec!["   {}".to_string()]);
}

#[test(tokio::test)]
async fn test_model_failure_is_500_with_message() {
    let gateway = TestGateway::start(StubModel::failing("vectorizer exploded")).await;

    let response = gateway.predict(&login_request()).await;
    assert_eq!(response.status(), 500);
    assert_eq!(
        json_body(response).await,
        json!({"error": "invalid model artifact: vectorizer exploded"})
    );
}

#[test(tokio::test)]
async fn test_out_of_range_probability_is_500() {
    let gateway = TestGateway::start(StubModel::returning(1.5)).await;

    let response = gateway.predict(&login_request()).await;
    assert_eq!(response.status(), 500);
    assert_eq!(
        json_body(response).await["error"],
        "model returned an invalid probability: 1.5"
    );
}

#[test(tokio::test)]
async fn test_wrongly_typed_payload_is_500() {
    let model = StubModel::returning(0.9);
    let gateway = TestGateway::start(model.clone()).await;

    for payload in [json!(["GET", "/"]), json!({"method": 5}), json!({"headers": null})] {
        let response = gateway.predict(&payload).await;
        assert_eq!(response.status(), 500, "payload {payload}");
        let body = json_body(response).await;
        assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
    }
    assert!(model.seen().is_empty());
}

#[test(tokio::test)]
async fn test_non_json_body_is_400() {
    let gateway = TestGateway::start(StubModel::returning(0.9)).await;

    let cases = [
        (Some("text/plain"), r#"{"method":"GET"}"#),
        (None, r#"{"method":"GET"}"#),
        (Some("application/json"), "method=GET&url=/"),
        (Some("application/json"), ""),
    ];
    for (content_type, body) in cases {
        let response = gateway
            .predict_raw(Some(TEST_TOKEN), content_type, body)
            .await;
        assert_eq!(response.status(), 400, "content type {content_type:?}");
        assert_eq!(
            json_body(response).await,
            json!({"error": "Request must be JSON."})
        );
    }
}

#[test(tokio::test)]
async fn test_oversized_body_is_413() {
    let state = AppState::new(StubModel::returning(0.9), TEST_TOKEN).with_max_body_bytes(64);
    let gateway = TestGateway::start_with_state(state).await;

    let payload = json!({"method": "POST", "url": "/", "body": {"blob": "a".repeat(256)}});
    let response = gateway.predict(&payload).await;
    assert_eq!(response.status(), 413);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Request body too large."})
    );

    let small = gateway.predict(&json!({"url": "/"})).await;
    assert_eq!(small.status(), 200);
}
