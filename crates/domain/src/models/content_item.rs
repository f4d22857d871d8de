//! Content item domain model and eligibility window logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Kind of displayable content. The payload shape is renderer-specific and
/// opaque to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "content_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    VerseHadith,
    Announcement,
    Event,
    Custom,
    AsmaAlHusna,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::VerseHadith => "VERSE_HADITH",
            ContentType::Announcement => "ANNOUNCEMENT",
            ContentType::Event => "EVENT",
            ContentType::Custom => "CUSTOM",
            ContentType::AsmaAlHusna => "ASMA_AL_HUSNA",
        }
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VERSE_HADITH" => Ok(ContentType::VerseHadith),
            "ANNOUNCEMENT" => Ok(ContentType::Announcement),
            "EVENT" => Ok(ContentType::Event),
            "CUSTOM" => Ok(ContentType::Custom),
            "ASMA_AL_HUSNA" => Ok(ContentType::AsmaAlHusna),
            other => Err(format!("Unknown content type: {}", other)),
        }
    }
}

/// One unit of displayable content with an eligibility window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContentItem {
    pub id: Uuid,
    pub masjid_id: Uuid,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub title: String,
    /// Opaque structured payload interpreted by the renderer.
    pub content: serde_json::Value,
    pub duration_secs: i32,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// An item is currently eligible iff it is active and `now` falls inside
    /// its [start_date, end_date] window (absent bounds are open).
    pub fn is_eligible(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        if let Some(start) = self.start_date {
            if start > now {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if end < now {
                return false;
            }
        }
        true
    }
}

/// Request to create a content item.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateContentItemRequest {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[serde(default = "default_content")]
    pub content: serde_json::Value,
    #[validate(range(min = 1, max = 3600, message = "duration_secs must be 1-3600"))]
    pub duration_secs: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

/// Request to update a content item. All fields optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateContentItemRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    #[validate(range(min = 1, max = 3600, message = "duration_secs must be 1-3600"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Send null to clear the bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<DateTime<Utc>>>,
}

fn default_content() -> serde_json::Value {
    serde_json::json!({})
}

fn default_true() -> bool {
    true
}
