// File: rds-ops/src/web/middleware.rs
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use tracing::warn;

use crate::web::AppState;

/// Validates the `Authorization: Bearer <key>` header against the configured
/// API key. Routes that start, stop or report take this as their first
/// argument. Without a configured key every request is rejected.
pub struct ApiKeyAuth;

impl FromRequestParts<AppState> for ApiKeyAuth {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.api_key.as_deref() else {
            warn!("Rejecting {}: no API key is configured", parts.uri.path());
            return Err(StatusCode::UNAUTHORIZED);
        };

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "));

        match auth_header {
            Some(token) if token == expected => Ok(ApiKeyAuth),
            _ => {
                warn!("Rejecting {}: missing or invalid API key", parts.uri.path());
                Err(StatusCode::UNAUTHORIZED)
            }
        }
    }
}
