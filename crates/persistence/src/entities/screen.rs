//! Screen entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::screen::{Orientation, ScreenStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the screens table.
#[derive(Debug, Clone, FromRow)]
pub struct ScreenEntity {
    pub id: Uuid,
    pub masjid_id: Option<Uuid>,
    pub name: String,
    pub api_key: Option<String>,
    pub pairing_code: Option<String>,
    pub pairing_code_expires_at: Option<DateTime<Utc>>,
    pub claimed_code: Option<String>,
    pub claimed_code_expires_at: Option<DateTime<Utc>>,
    pub status: ScreenStatus,
    pub is_active: bool,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub orientation: Orientation,
    pub device_type: Option<String>,
    pub location: Option<String>,
    pub schedule_id: Option<Uuid>,
    pub content_config: serde_json::Value,
    pub content_overrides: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ScreenEntity> for domain::models::Screen {
    fn from(entity: ScreenEntity) -> Self {
        Self {
            id: entity.id,
            masjid_id: entity.masjid_id,
            name: entity.name,
            api_key: entity.api_key,
            pairing_code: entity.pairing_code,
            pairing_code_expires_at: entity.pairing_code_expires_at,
            claimed_code: entity.claimed_code,
            claimed_code_expires_at: entity.claimed_code_expires_at,
            status: entity.status,
            is_active: entity.is_active,
            last_seen_at: entity.last_seen_at,
            orientation: entity.orientation,
            device_type: entity.device_type,
            location: entity.location,
            schedule_id: entity.schedule_id,
            content_config: entity.content_config,
            content_overrides: entity.content_overrides,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entity() -> ScreenEntity {
        ScreenEntity {
            id: Uuid::new_v4(),
            masjid_id: Some(Uuid::new_v4()),
            name: "Prayer Hall".to_string(),
            api_key: Some("msk_abcdefgh".to_string()),
            pairing_code: None,
            pairing_code_expires_at: None,
            claimed_code: None,
            claimed_code_expires_at: None,
            status: ScreenStatus::Online,
            is_active: true,
            last_seen_at: Some(Utc::now()),
            orientation: Orientation::Portrait,
            device_type: Some("android-tv".to_string()),
            location: Some("Main entrance".to_string()),
            schedule_id: None,
            content_config: serde_json::json!({"brightness": 80}),
            content_overrides: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_screen_entity_to_domain() {
        let entity = create_test_entity();
        let screen: domain::models::Screen = entity.clone().into();

        assert_eq!(screen.id, entity.id);
        assert_eq!(screen.masjid_id, entity.masjid_id);
        assert_eq!(screen.name, entity.name);
        assert_eq!(screen.api_key, entity.api_key);
        assert_eq!(screen.status, ScreenStatus::Online);
        assert_eq!(screen.orientation, Orientation::Portrait);
        assert_eq!(screen.content_config["brightness"], 80);
    }

    #[test]
    fn test_screen_entity_optional_fields() {
        let mut entity = create_test_entity();
        entity.masjid_id = None;
        entity.api_key = None;
        entity.last_seen_at = None;

        let screen: domain::models::Screen = entity.into();
        assert!(screen.masjid_id.is_none());
        assert!(screen.api_key.is_none());
        assert!(screen.last_seen_at.is_none());
        assert!(!screen.is_claimed());
    }
}
