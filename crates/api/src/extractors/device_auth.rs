//! Device (screen) authentication extractor.
//!
//! Devices authenticate every request with the API key issued at claim time
//! plus their screen id: `Authorization: Bearer <api_key>` and
//! `X-Screen-ID: <uuid>`. Validation fails closed on any mismatch.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::Screen;
use sqlx::PgPool;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use persistence::repositories::ScreenRepository;
use shared::crypto::{extract_key_prefix, API_KEY_PREFIX};

/// Header carrying the screen id on device requests.
pub const SCREEN_ID_HEADER: &str = "X-Screen-ID";

/// An authenticated screen.
///
/// Authentication has a documented side effect: the screen's last_seen_at
/// and stored status are refreshed to now/ONLINE as part of `validate`, so
/// any authenticated request counts as a liveness signal.
#[derive(Debug, Clone)]
pub struct DeviceAuth {
    pub screen: Screen,
}

impl DeviceAuth {
    /// Validates the credential pair and returns the authenticated screen.
    ///
    /// Requires an exact api_key match on an active screen. Deleted,
    /// inactive, and never-claimed screens all fail with the same
    /// Unauthorized to avoid leaking which part of the pair was wrong.
    pub async fn validate(
        pool: &PgPool,
        screen_id: Uuid,
        api_key: &str,
    ) -> Result<Self, ApiError> {
        if !api_key.starts_with(API_KEY_PREFIX) {
            return Err(unauthorized());
        }

        let repo = ScreenRepository::new(pool.clone());
        let entity = repo
            .find_by_id(screen_id)
            .await
            .map_err(|e| {
                tracing::error!("Database error during screen auth: {}", e);
                ApiError::Internal("Authentication service unavailable".to_string())
            })?
            .ok_or_else(unauthorized)?;

        let screen: Screen = entity.into();

        if !screen.is_active {
            return Err(unauthorized());
        }
        match &screen.api_key {
            Some(stored) if stored == api_key => {}
            _ => {
                // Log only the key prefix, never the full credential
                tracing::debug!(
                    screen_id = %screen.id,
                    key_prefix = extract_key_prefix(api_key).unwrap_or("malformed"),
                    "Screen presented a key that does not match the stored one"
                );
                return Err(unauthorized());
            }
        }

        // Liveness side effect, awaited so callers observe a consistent
        // last_seen after auth. A failed refresh fails the request: the
        // contract is that every authenticated request counts as seen.
        repo.touch_seen(screen.id).await.map_err(|e| {
            tracing::error!("Failed to refresh last_seen for screen {}: {}", screen.id, e);
            ApiError::Internal("Authentication service unavailable".to_string())
        })?;

        Ok(DeviceAuth { screen })
    }
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Invalid screen credentials".to_string())
}

#[async_trait]
impl FromRequestParts<AppState> for DeviceAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let screen_id = parts
            .headers
            .get(SCREEN_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or_else(unauthorized)?;

        let api_key = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or_else(unauthorized)?;

        Self::validate(&state.pool, screen_id, api_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_id_header_constant() {
        assert_eq!(SCREEN_ID_HEADER, "X-Screen-ID");
    }

    #[test]
    fn test_unauthorized_message_is_uniform() {
        match unauthorized() {
            ApiError::Unauthorized(msg) => assert_eq!(msg, "Invalid screen credentials"),
            _ => panic!("Expected Unauthorized"),
        }
    }
}
