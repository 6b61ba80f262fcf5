//! Integration tests for the WAF inference gateway.
//!
//! These tests drive `/`, `/health` and `/predict` over real HTTP and check
//! status codes, JSON bodies and the telemetry records the middleware emits.

pub mod auth_test;
pub mod predict_test;
pub mod artifact_test;
