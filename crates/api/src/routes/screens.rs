//! Admin screen management handlers.
//!
//! All operations are scoped to the session's masjid; a screen belonging to
//! another masjid is indistinguishable from one that does not exist.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminSession;
use domain::models::screen::{ScreenSummary, UpdateScreenRequest};
use domain::models::Screen;
use persistence::repositories::{ContentScheduleRepository, ScreenRepository};

/// Response for screen listing.
#[derive(Debug, Serialize)]
pub struct ListScreensResponse {
    pub screens: Vec<ScreenSummary>,
}

/// List the masjid's screens with derived liveness.
///
/// GET /api/v1/admin/screens
pub async fn list_screens(
    session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<ListScreensResponse>, ApiError> {
    let repo = ScreenRepository::new(state.pool.clone());
    let now = Utc::now();

    let screens = repo
        .list_for_masjid(session.masjid_id)
        .await?
        .into_iter()
        .map(|entity| {
            let screen: Screen = entity.into();
            ScreenSummary::from_screen(&screen, now)
        })
        .collect();

    Ok(Json(ListScreensResponse { screens }))
}

/// Get one screen.
///
/// GET /api/v1/admin/screens/:screen_id
pub async fn get_screen(
    session: AdminSession,
    State(state): State<AppState>,
    Path(screen_id): Path<Uuid>,
) -> Result<Json<ScreenSummary>, ApiError> {
    let repo = ScreenRepository::new(state.pool.clone());
    let entity = repo
        .find_for_masjid(screen_id, session.masjid_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Screen not found".to_string()))?;

    let screen: Screen = entity.into();
    Ok(Json(ScreenSummary::from_screen(&screen, Utc::now())))
}

/// Update a screen's name, orientation, location, or schedule override.
///
/// PATCH /api/v1/admin/screens/:screen_id
///
/// schedule_id is tri-state: absent leaves the override untouched, null
/// clears it (fall back to the masjid default), a value assigns it after a
/// tenant check on the schedule.
pub async fn update_screen(
    session: AdminSession,
    State(state): State<AppState>,
    Path(screen_id): Path<Uuid>,
    Json(request): Json<UpdateScreenRequest>,
) -> Result<Json<ScreenSummary>, ApiError> {
    request.validate()?;

    let repo = ScreenRepository::new(state.pool.clone());

    let mut entity = repo
        .update(
            screen_id,
            session.masjid_id,
            request.name.as_deref(),
            request.orientation,
            request.location.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Screen not found".to_string()))?;

    if let Some(schedule_id) = request.schedule_id {
        if let Some(id) = schedule_id {
            let schedule_repo = ContentScheduleRepository::new(state.pool.clone());
            schedule_repo
                .find_for_masjid(id, session.masjid_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Schedule not found".to_string()))?;
        }
        entity = repo
            .assign_schedule(screen_id, session.masjid_id, schedule_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Screen not found".to_string()))?;
    }

    let screen: Screen = entity.into();
    Ok(Json(ScreenSummary::from_screen(&screen, Utc::now())))
}

/// Delete a screen.
///
/// DELETE /api/v1/admin/screens/:screen_id
pub async fn delete_screen(
    session: AdminSession,
    State(state): State<AppState>,
    Path(screen_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = ScreenRepository::new(state.pool.clone());
    let deleted = repo.delete(screen_id, session.masjid_id).await?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Screen not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
