//! Pairing endpoint handlers.
//!
//! The pairing flow: an unclaimed device requests a short code and polls
//! with it; an admin types the code into the dashboard to claim the screen
//! for their masjid; the next device poll delivers the API key. Codes are
//! single-use and expire after 15 minutes.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminSession;
use crate::middleware::metrics::{record_pairing_code_issued, record_screen_claimed};
use domain::models::screen::{
    generate_pairing_code, pairing_code_expiry, CheckPairingResponse, ClaimScreenRequest,
    ClaimScreenResponse, CompletePairingResponse, PairingCodeRequest, RequestPairingRequest,
    RequestPairingResponse, ScreenSummary, PAIRING_POLL_INTERVAL_MS,
};
use persistence::repositories::ScreenRepository;
use shared::crypto::generate_api_key;

/// Whether a database error is a unique violation (code 23505).
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}

/// Issue a pairing code to an unclaimed device.
///
/// POST /api/v1/screens/unpaired
///
/// Unauthenticated bootstrap entry point. Creates an unpaired screen row in
/// PAIRING state holding the fresh code.
pub async fn request_pairing_code(
    State(state): State<AppState>,
    Json(request): Json<RequestPairingRequest>,
) -> Result<(StatusCode, Json<RequestPairingResponse>), ApiError> {
    request.validate()?;

    let repo = ScreenRepository::new(state.pool.clone());
    let orientation = request.orientation.unwrap_or_default();

    // Sweep abandoned unpaired rows on each bootstrap so expired codes do
    // not sit in the live-code index forever.
    let purged = repo.purge_expired_unpaired().await?;
    if purged > 0 {
        tracing::debug!(purged, "Purged expired unpaired screens");
    }

    // The partial unique index on live pairing codes turns a collision into
    // a unique violation; with a 36^6 code space one retry is enough.
    let mut attempts = 0;
    let screen = loop {
        let code = generate_pairing_code();
        let expires_at = pairing_code_expiry();
        match repo
            .create_unpaired(&code, expires_at, request.device_type.as_deref(), orientation)
            .await
        {
            Ok(screen) => break screen,
            Err(e) if is_unique_violation(&e) && attempts < 1 => {
                attempts += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    };

    record_pairing_code_issued();
    info!(screen_id = %screen.id, "Issued pairing code");

    // The code was just inserted, both fields are present on the row.
    let (pairing_code, expires_at) = match (screen.pairing_code, screen.pairing_code_expires_at) {
        (Some(code), Some(expires_at)) => (code, expires_at),
        _ => return Err(ApiError::Internal("Pairing code missing after insert".to_string())),
    };

    Ok((
        StatusCode::CREATED,
        Json(RequestPairingResponse {
            pairing_code,
            expires_at,
            check_interval_ms: PAIRING_POLL_INTERVAL_MS,
        }),
    ))
}

/// Poll the status of a pairing code.
///
/// POST /api/v1/screens/unpaired/check
///
/// Returns pending while the code is live and unclaimed, and the API key
/// exactly while the claimed code's original validity window is open.
/// Unknown and expired codes are NotFound, distinct from pending.
pub async fn check_pairing_status(
    State(state): State<AppState>,
    Json(request): Json<PairingCodeRequest>,
) -> Result<Json<CheckPairingResponse>, ApiError> {
    request.validate()?;

    let repo = ScreenRepository::new(state.pool.clone());

    if repo.find_by_live_code(&request.pairing_code).await?.is_some() {
        return Ok(Json(CheckPairingResponse::pending()));
    }

    if let Some(entity) = repo.find_by_claimed_code(&request.pairing_code).await? {
        if let (Some(api_key), Some(masjid_id)) = (entity.api_key, entity.masjid_id) {
            return Ok(Json(CheckPairingResponse::claimed(api_key, masjid_id)));
        }
    }

    Err(ApiError::NotFound(
        "Pairing code not found or expired".to_string(),
    ))
}

/// Claim an unpaired screen for the session's masjid.
///
/// POST /api/v1/screens/pair (admin session)
///
/// The canonical claim transition. Exactly one of any set of concurrent
/// claims on the same code wins; the losers observe NotFound.
pub async fn claim_screen(
    session: AdminSession,
    State(state): State<AppState>,
    Json(request): Json<ClaimScreenRequest>,
) -> Result<Json<ClaimScreenResponse>, ApiError> {
    request.validate()?;

    let repo = ScreenRepository::new(state.pool.clone());
    let api_key = generate_api_key();

    let entity = repo
        .claim(
            &request.pairing_code,
            session.masjid_id,
            &request.name,
            request.location.as_deref(),
            &api_key,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Pairing code not found or expired".to_string()))?;

    record_screen_claimed();
    info!(
        screen_id = %entity.id,
        masjid_id = %session.masjid_id,
        "Screen claimed"
    );

    let screen: domain::models::Screen = entity.into();
    Ok(Json(ClaimScreenResponse {
        success: true,
        screen: ScreenSummary::from_screen(&screen, Utc::now()),
    }))
}

/// Device-side acknowledgement of a completed claim.
///
/// PUT /api/v1/screens/pair
///
/// Deprecated alias kept for older firmware: it never performs the claim,
/// it only consumes the retained claimed code after an admin claim and
/// hands over the API key.
pub async fn complete_pairing(
    State(state): State<AppState>,
    Json(request): Json<PairingCodeRequest>,
) -> Result<Json<CompletePairingResponse>, ApiError> {
    request.validate()?;

    let repo = ScreenRepository::new(state.pool.clone());
    let entity = repo
        .complete_pairing(&request.pairing_code)
        .await?
        .ok_or_else(|| {
            ApiError::InvalidOrExpired("Pairing code is not claimable".to_string())
        })?;

    let api_key = entity
        .api_key
        .ok_or_else(|| ApiError::Internal("Claimed screen has no API key".to_string()))?;

    Ok(Json(CompletePairingResponse {
        screen_id: entity.id,
        api_key,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_detection_ignores_row_not_found() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
