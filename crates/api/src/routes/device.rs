//! Device-facing endpoint handlers: content resolution and heartbeat.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::DeviceAuth;
use crate::middleware::metrics::record_heartbeat;
use domain::models::screen::{HeartbeatRequest, HeartbeatResponse, ScreenStatus};
use domain::models::MasjidInfo;
use domain::services::schedule_resolution::{
    resolve_items, ResolvedContent, ResolvedSchedule, ResolvedScreen, ScheduledItem,
};
use persistence::repositories::{
    ContentScheduleRepository, MasjidRepository, PrayerTimeRepository, ScreenRepository,
};

/// Resolve what the screen should show right now.
///
/// GET /api/v1/screen/content
///
/// Assembles the full snapshot: effective schedule (screen override, else
/// masjid default), eligible items in display order, today's prayer times,
/// and the screen's opaque overrides. The sub-reads are not one transaction;
/// a concurrent admin edit may appear in one and not another.
pub async fn get_content(
    auth: DeviceAuth,
    State(state): State<AppState>,
) -> Result<Json<ResolvedContent>, ApiError> {
    let screen = auth.screen;
    let now = Utc::now();

    let masjid_id = screen
        .masjid_id
        .ok_or_else(|| ApiError::Forbidden("Screen is not associated with a masjid".to_string()))?;

    let masjid_repo = MasjidRepository::new(state.pool.clone());
    let schedule_repo = ContentScheduleRepository::new(state.pool.clone());
    let prayer_repo = PrayerTimeRepository::new(state.pool.clone());

    let masjid: domain::models::Masjid = masjid_repo
        .find_by_id(masjid_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Masjid not found".to_string()))?
        .into();

    // Effective schedule: per-screen override wins, else the masjid default.
    // Inactive schedules resolve as no schedule at all.
    let effective = match screen.schedule_id {
        Some(schedule_id) => schedule_repo.find_for_masjid(schedule_id, masjid_id).await?,
        None => schedule_repo.find_default(masjid_id).await?,
    }
    .filter(|s| s.is_active);

    let schedule = match effective {
        Some(entity) => {
            let rows = schedule_repo.find_items_with_content(entity.id).await?;
            let scheduled: Vec<ScheduledItem> = rows.into_iter().map(Into::into).collect();
            Some(ResolvedSchedule {
                id: entity.id,
                name: entity.name,
                is_default: entity.is_default,
                items: resolve_items(scheduled, now),
            })
        }
        None => None,
    };

    let prayer_times = prayer_repo
        .find_for_day(masjid_id, now.date_naive())
        .await?
        .map(Into::into);

    Ok(Json(ResolvedContent {
        screen: ResolvedScreen {
            id: screen.id,
            name: screen.name,
            orientation: screen.orientation,
            content_config: screen.content_config,
        },
        masjid: MasjidInfo::from(&masjid),
        schedule,
        prayer_times,
        content_overrides: screen.content_overrides,
        last_updated: now,
    }))
}

/// Record a device heartbeat.
///
/// POST /api/v1/screen/heartbeat
///
/// Refreshes last_seen, stores the reported status (ONLINE when absent),
/// and shallow-merges device metrics into the screen's content_config.
pub async fn heartbeat(
    auth: DeviceAuth,
    State(state): State<AppState>,
    Json(request): Json<HeartbeatRequest>,
) -> Result<Json<HeartbeatResponse>, ApiError> {
    let status = request.status.unwrap_or(ScreenStatus::Online);

    // PAIRING is reserved for unclaimed screens; an authenticated device
    // can only report its runtime liveness.
    if status == ScreenStatus::Pairing {
        return Err(ApiError::Validation(
            "status must be ONLINE or OFFLINE".to_string(),
        ));
    }

    let repo = ScreenRepository::new(state.pool.clone());
    let updated = repo
        .record_heartbeat(auth.screen.id, status, request.metrics.as_ref())
        .await?;

    // The screen can disappear between auth and the write; a heartbeat for
    // a deleted screen is an auth failure, not a silent success.
    if updated == 0 {
        return Err(ApiError::Unauthorized(
            "Invalid screen credentials".to_string(),
        ));
    }

    record_heartbeat();
    Ok(Json(HeartbeatResponse { success: true }))
}
