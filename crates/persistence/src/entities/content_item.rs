//! Content item entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::content_item::ContentType;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the content_items table.
#[derive(Debug, Clone, FromRow)]
pub struct ContentItemEntity {
    pub id: Uuid,
    pub masjid_id: Uuid,
    pub content_type: ContentType,
    pub title: String,
    pub content: serde_json::Value,
    pub duration_secs: i32,
    pub is_active: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContentItemEntity> for domain::models::ContentItem {
    fn from(entity: ContentItemEntity) -> Self {
        Self {
            id: entity.id,
            masjid_id: entity.masjid_id,
            content_type: entity.content_type,
            title: entity.title,
            content: entity.content,
            duration_secs: entity.duration_secs,
            is_active: entity.is_active,
            start_date: entity.start_date,
            end_date: entity.end_date,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
