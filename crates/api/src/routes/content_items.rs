//! Admin content item handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminSession;
use domain::models::{
    ContentItem, ContentType, CreateContentItemRequest, UpdateContentItemRequest,
};
use persistence::repositories::ContentItemRepository;

/// Query parameters for item listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListContentItemsQuery {
    #[serde(rename = "type")]
    pub content_type: Option<ContentType>,
}

/// Response for item listing.
#[derive(Debug, Serialize)]
pub struct ListContentItemsResponse {
    pub items: Vec<ContentItem>,
}

/// Create a content item.
///
/// POST /api/v1/admin/content
pub async fn create_content_item(
    session: AdminSession,
    State(state): State<AppState>,
    Json(request): Json<CreateContentItemRequest>,
) -> Result<(StatusCode, Json<ContentItem>), ApiError> {
    request.validate()?;

    if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
        if start > end {
            return Err(ApiError::Validation(
                "start_date must not be after end_date".to_string(),
            ));
        }
    }

    let repo = ContentItemRepository::new(state.pool.clone());
    let entity = repo
        .create(
            session.masjid_id,
            request.content_type,
            &request.title,
            &request.content,
            request.duration_secs,
            request.is_active,
            request.start_date,
            request.end_date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(entity.into())))
}

/// List the masjid's content items, optionally filtered by type.
///
/// GET /api/v1/admin/content?type=ANNOUNCEMENT
pub async fn list_content_items(
    session: AdminSession,
    State(state): State<AppState>,
    Query(query): Query<ListContentItemsQuery>,
) -> Result<Json<ListContentItemsResponse>, ApiError> {
    let repo = ContentItemRepository::new(state.pool.clone());
    let items = repo
        .list_for_masjid(session.masjid_id, query.content_type)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ListContentItemsResponse { items }))
}

/// Get one content item.
///
/// GET /api/v1/admin/content/:item_id
pub async fn get_content_item(
    session: AdminSession,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ContentItem>, ApiError> {
    let repo = ContentItemRepository::new(state.pool.clone());
    let entity = repo
        .find_for_masjid(item_id, session.masjid_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Content item not found".to_string()))?;

    Ok(Json(entity.into()))
}

/// Update a content item.
///
/// PATCH /api/v1/admin/content/:item_id
///
/// start_date and end_date are tri-state: absent keeps the bound, null
/// clears it, a value replaces it.
pub async fn update_content_item(
    session: AdminSession,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(request): Json<UpdateContentItemRequest>,
) -> Result<Json<ContentItem>, ApiError> {
    request.validate()?;

    // Only validate window ordering when both bounds are being set.
    if let (Some(Some(start)), Some(Some(end))) = (request.start_date, request.end_date) {
        if start > end {
            return Err(ApiError::Validation(
                "start_date must not be after end_date".to_string(),
            ));
        }
    }

    let repo = ContentItemRepository::new(state.pool.clone());
    let entity = repo
        .update(
            item_id,
            session.masjid_id,
            request.title.as_deref(),
            request.content.as_ref(),
            request.duration_secs,
            request.is_active,
            request.start_date,
            request.end_date,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Content item not found".to_string()))?;

    Ok(Json(entity.into()))
}

/// Delete a content item.
///
/// DELETE /api/v1/admin/content/:item_id
///
/// Schedule rows referencing it cascade away.
pub async fn delete_content_item(
    session: AdminSession,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = ContentItemRepository::new(state.pool.clone());
    let deleted = repo.delete(item_id, session.masjid_id).await?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Content item not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
