//! Static bearer-token authentication.
//!
//! Every `/api/v1/*` endpoint requires an `Authorization: Bearer <key>` header
//! whose key matches the configured secret. `/` and `/api/health` are public.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

use crate::error::ApiError;

/// Axum middleware that rejects requests without a valid `Authorization: Bearer`
/// header. The expected key is injected via the [`ApiKey`] extension.
///
/// Runs before any handler extractor, so a bad token is reported as `401`
/// even when the request body is malformed.
///
/// # Error responses
///
/// - `401 Unauthorized` — header missing or malformed
/// - `401 Unauthorized` — key present but different from the configured one
/// - `500 Internal Server Error` — [`ApiKey`] extension not found (misconfiguration)
pub async fn require_api_key(request: Request, next: Next) -> Response {
    let expected = match request.extensions().get::<ApiKey>() {
        Some(key) => key.0.clone(),
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "Server configuration error"})),
            )
                .into_response();
        }
    };

    let auth_header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if let Err(err) = check_bearer(&expected, auth_header) {
        debug!(path = %request.uri().path(), reason = %err, "Rejected request");
        return err.into_response();
    }

    next.run(request).await
}

/// Validate an `Authorization` header value against the expected key.
pub fn check_bearer(expected: &str, header: Option<&str>) -> Result<(), ApiError> {
    let Some(provided) = header.and_then(|h| h.strip_prefix("Bearer ")) else {
        return Err(ApiError::Unauthorized(
            "Missing or invalid authorization header",
        ));
    };

    if !constant_time_eq(expected.as_bytes(), provided.as_bytes()) {
        return Err(ApiError::Unauthorized("Invalid API key"));
    }
    Ok(())
}

/// Constant-time byte comparison to prevent timing side-channel attacks.
///
/// Always iterates over the full length of `expected` regardless of `provided`
/// length, so an attacker cannot determine the key length from response times.
pub fn constant_time_eq(expected: &[u8], provided: &[u8]) -> bool {
    let mut diff = u8::from(expected.len() != provided.len());
    for (i, e) in expected.iter().enumerate() {
        let p = provided.get(i).copied().unwrap_or(0xff);
        diff |= e ^ p;
    }
    diff == 0
}

/// Extension type carrying the expected API key, injected into the router
/// layer so [`require_api_key`] can access it without touching `AppState`.
#[derive(Clone)]
pub struct ApiKey(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"secreT"));
        assert!(!constant_time_eq(b"secret", b"secret-longer"));
        assert!(!constant_time_eq(b"secret", b"sec"));
        assert!(constant_time_eq(b"", b""));
        assert!(!constant_time_eq(b"", b"x"));
    }

    #[test]
    fn test_check_bearer_valid() {
        assert_eq!(check_bearer("k", Some("Bearer k")), Ok(()));
    }

    #[test]
    fn test_check_bearer_missing_or_malformed() {
        let missing = ApiError::Unauthorized("Missing or invalid authorization header");
        assert_eq!(check_bearer("k", None), Err(missing.clone()));
        assert_eq!(check_bearer("k", Some("Basic k")), Err(missing.clone()));
        assert_eq!(check_bearer("k", Some("bearer k")), Err(missing));
    }

    #[test]
    fn test_check_bearer_wrong_key() {
        assert_eq!(
            check_bearer("k", Some("Bearer nope")),
            Err(ApiError::Unauthorized("Invalid API key"))
        );
    }

    #[test]
    fn test_empty_key_accepts_empty_token() {
        assert_eq!(check_bearer("", Some("Bearer ")), Ok(()));
        assert!(check_bearer("", Some("Bearer x")).is_err());
    }
}
