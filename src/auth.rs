use http::{header::AUTHORIZATION, HeaderMap};
use tracing::debug;

use crate::error::AppError;

/// Checks `Authorization: Bearer <token>` against the configured token.
pub fn authorize(headers: &HeaderMap, token: &str) -> Result<(), AppError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        debug!("Missing authorization header");
        return Err(AppError::Unauthorized);
    };

    let supplied = value
        .as_bytes()
        .strip_prefix(b"Bearer ")
        .ok_or(AppError::Unauthorized)?;

    if constant_time_eq(supplied, token.as_bytes()) {
        Ok(())
    } else {
        debug!("Bearer token mismatch");
        Err(AppError::Unauthorized)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
