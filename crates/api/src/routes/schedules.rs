//! Admin content schedule handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminSession;
use domain::models::{
    ContentSchedule, CreateScheduleRequest, DuplicateScheduleRequest, ScheduleWithItems,
    UpdateScheduleRequest,
};
use persistence::repositories::ContentScheduleRepository;

/// Response for schedule listing.
#[derive(Debug, Serialize)]
pub struct ListSchedulesResponse {
    pub schedules: Vec<ContentSchedule>,
}

async fn load_with_items(
    repo: &ContentScheduleRepository,
    schedule: ContentSchedule,
) -> Result<ScheduleWithItems, ApiError> {
    let items = repo
        .find_items(schedule.id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(ScheduleWithItems { schedule, items })
}

/// Create a schedule with an ordered item list.
///
/// POST /api/v1/admin/schedules
///
/// Creating a second default for the masjid is a Conflict.
pub async fn create_schedule(
    session: AdminSession,
    State(state): State<AppState>,
    Json(request): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleWithItems>), ApiError> {
    request.validate()?;

    let repo = ContentScheduleRepository::new(state.pool.clone());
    let schedule = repo
        .create(
            session.masjid_id,
            &request.name,
            request.is_default,
            &request.item_ids,
        )
        .await
        .map_err(|e| match e {
            // insert_items signals an unknown or foreign item this way
            sqlx::Error::RowNotFound => {
                ApiError::NotFound("Content item not found".to_string())
            }
            other => other.into(),
        })?;

    let body = load_with_items(&repo, schedule.into()).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// List the masjid's schedules.
///
/// GET /api/v1/admin/schedules
pub async fn list_schedules(
    session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<ListSchedulesResponse>, ApiError> {
    let repo = ContentScheduleRepository::new(state.pool.clone());
    let schedules = repo
        .list_for_masjid(session.masjid_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ListSchedulesResponse { schedules }))
}

/// Get one schedule with its ordered items.
///
/// GET /api/v1/admin/schedules/:schedule_id
pub async fn get_schedule(
    session: AdminSession,
    State(state): State<AppState>,
    Path(schedule_id): Path<Uuid>,
) -> Result<Json<ScheduleWithItems>, ApiError> {
    let repo = ContentScheduleRepository::new(state.pool.clone());
    let schedule = repo
        .find_for_masjid(schedule_id, session.masjid_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Schedule not found".to_string()))?;

    let body = load_with_items(&repo, schedule.into()).await?;
    Ok(Json(body))
}

/// Update a schedule's name, active flag, or full item list.
///
/// PATCH /api/v1/admin/schedules/:schedule_id
pub async fn update_schedule(
    session: AdminSession,
    State(state): State<AppState>,
    Path(schedule_id): Path<Uuid>,
    Json(request): Json<UpdateScheduleRequest>,
) -> Result<Json<ScheduleWithItems>, ApiError> {
    request.validate()?;

    let repo = ContentScheduleRepository::new(state.pool.clone());
    let schedule = repo
        .update(
            schedule_id,
            session.masjid_id,
            request.name.as_deref(),
            request.is_active,
            request.item_ids.as_deref(),
        )
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                ApiError::NotFound("Content item not found".to_string())
            }
            other => other.into(),
        })?
        .ok_or_else(|| ApiError::NotFound("Schedule not found".to_string()))?;

    let body = load_with_items(&repo, schedule.into()).await?;
    Ok(Json(body))
}

/// Make a schedule the masjid default, displacing the previous default.
///
/// POST /api/v1/admin/schedules/:schedule_id/default
pub async fn set_default_schedule(
    session: AdminSession,
    State(state): State<AppState>,
    Path(schedule_id): Path<Uuid>,
) -> Result<Json<ContentSchedule>, ApiError> {
    let repo = ContentScheduleRepository::new(state.pool.clone());
    let schedule = repo
        .set_default(schedule_id, session.masjid_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Schedule not found".to_string()))?;

    Ok(Json(schedule.into()))
}

/// Duplicate a schedule and its item list under a new name.
///
/// POST /api/v1/admin/schedules/:schedule_id/duplicate
pub async fn duplicate_schedule(
    session: AdminSession,
    State(state): State<AppState>,
    Path(schedule_id): Path<Uuid>,
    Json(request): Json<DuplicateScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleWithItems>), ApiError> {
    request.validate()?;

    let repo = ContentScheduleRepository::new(state.pool.clone());
    let copy = repo
        .duplicate(schedule_id, session.masjid_id, &request.name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Schedule not found".to_string()))?;

    let body = load_with_items(&repo, copy.into()).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// Delete a schedule.
///
/// DELETE /api/v1/admin/schedules/:schedule_id
///
/// Screens pointing at it fall back to the masjid default.
pub async fn delete_schedule(
    session: AdminSession,
    State(state): State<AppState>,
    Path(schedule_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = ContentScheduleRepository::new(state.pool.clone());
    let deleted = repo.delete(schedule_id, session.masjid_id).await?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Schedule not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
