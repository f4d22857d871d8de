//! Content schedule entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::content_item::ContentType;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the content_schedules table.
#[derive(Debug, Clone, FromRow)]
pub struct ContentScheduleEntity {
    pub id: Uuid,
    pub masjid_id: Uuid,
    pub name: String,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContentScheduleEntity> for domain::models::ContentSchedule {
    fn from(entity: ContentScheduleEntity) -> Self {
        Self {
            id: entity.id,
            masjid_id: entity.masjid_id,
            name: entity.name,
            is_default: entity.is_default,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the content_schedule_items table.
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleItemEntity {
    pub id: i64,
    pub schedule_id: Uuid,
    pub content_item_id: Uuid,
    pub position: i32,
}

impl From<ScheduleItemEntity> for domain::models::ContentScheduleItem {
    fn from(entity: ScheduleItemEntity) -> Self {
        Self {
            id: entity.id,
            schedule_id: entity.schedule_id,
            content_item_id: entity.content_item_id,
            position: entity.position,
        }
    }
}

/// Join row of a schedule item with its content item, as loaded for
/// resolution.
#[derive(Debug, Clone, FromRow)]
pub struct ScheduledItemRow {
    pub row_id: i64,
    pub position: i32,
    pub item_id: Uuid,
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

impl From<ScheduledItemRow> for domain::services::schedule_resolution::ScheduledItem {
    fn from(row: ScheduledItemRow) -> Self {
        Self {
            row_id: row.row_id,
            position: row.position,
            item: domain::models::ContentItem {
                id: row.item_id,
                masjid_id: row.masjid_id,
                content_type: row.content_type,
                title: row.title,
                content: row.content,
                duration_secs: row.duration_secs,
                is_active: row.is_active,
                start_date: row.start_date,
                end_date: row.end_date,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_entity_to_domain() {
        let entity = ContentScheduleEntity {
            id: Uuid::new_v4(),
            masjid_id: Uuid::new_v4(),
            name: "Default playlist".to_string(),
            is_default: true,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let schedule: domain::models::ContentSchedule = entity.clone().into();
        assert_eq!(schedule.id, entity.id);
        assert!(schedule.is_default);
    }

    #[test]
    fn test_scheduled_item_row_to_domain() {
        let row = ScheduledItemRow {
            row_id: 7,
            position: 2,
            item_id: Uuid::new_v4(),
            masjid_id: Uuid::new_v4(),
            content_type: ContentType::Event,
            title: "Eid prayer".to_string(),
            content: serde_json::json!({}),
            duration_secs: 15,
            is_active: true,
            start_date: None,
            end_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let scheduled: domain::services::schedule_resolution::ScheduledItem = row.clone().into();
        assert_eq!(scheduled.row_id, 7);
        assert_eq!(scheduled.position, 2);
        assert_eq!(scheduled.item.title, "Eid prayer");
    }
}
