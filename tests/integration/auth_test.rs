use super::common::{json_body, StubModel, TestGateway, TEST_TOKEN};
use serde_json::json;
use test_log::test;
use waf_inference_gateway::AppState;

const VALID_PAYLOAD: &str = r#"{"method":"GET","url":"/login","headers":{"x":"1"},"body":{}}"#;

async fn assert_unauthorized(response: reqwest::Response) {
    assert_eq!(response.status(), 401);
    assert_eq!(json_body(response).await, json!({"error": "Unauthorized"}));
}

#[test(tokio::test)]
async fn test_missing_token_is_401() {
    let model = StubModel::returning(0.9);
    let gateway = TestGateway::start(model.clone()).await;

    let response = gateway
        .predict_raw(None, Some("application/json"), VALID_PAYLOAD)
        .await;
    assert_unauthorized(response).await;
    assert!(model.seen().is_empty());
}

#[test(tokio::test)]
async fn test_wrong_token_is_401() {
    let gateway = TestGateway::start(StubModel::returning(0.9)).await;

    for token in ["wrong", "integration-test-toke", "integration-test-token2", ""] {
        let response = gateway
            .predict_raw(Some(token), Some("application/json"), VALID_PAYLOAD)
            .await;
        assert_unauthorized(response).await;
    }
}

#[test(tokio::test)]
async fn test_auth_is_checked_before_the_body() {
    let gateway = TestGateway::start(StubModel::returning(0.9)).await;

    // Neither a non-JSON body nor a non-JSON content type changes the outcome.
    let response = gateway
        .predict_raw(Some("wrong"), Some("text/plain"), "not json at all")
        .await;
    assert_unauthorized(response).await;

    let response = gateway.predict_raw(None, None, "").await;
    assert_unauthorized(response).await;
}

#[test(tokio::test)]
async fn test_auth_is_checked_before_the_size_cap() {
    let state = AppState::new(StubModel::returning(0.9), TEST_TOKEN).with_max_body_bytes(16);
    let gateway = TestGateway::start_with_state(state).await;

    let response = gateway
        .predict_raw(None, Some("application/json"), VALID_PAYLOAD)
        .await;
    assert_unauthorized(response).await;
}

#[test(tokio::test)]
async fn test_non_bearer_scheme_is_401() {
    let gateway = TestGateway::start(StubModel::returning(0.9)).await;

    let response = gateway
        .client
        .post(gateway.url("/predict"))
        .header("Authorization", format!("Token {}", TEST_TOKEN))
        .header("Content-Type", "application/json")
        .body(VALID_PAYLOAD)
        .send()
        .await
        .expect("Failed to send request");
    assert_unauthorized(response).await;
}
