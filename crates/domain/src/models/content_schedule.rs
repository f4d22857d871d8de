//! Content schedule domain model: an ordered playlist of content items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// An ordered playlist belonging to one masjid. At most one schedule per
/// masjid carries `is_default = true`; screens without an explicit override
/// resolve to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContentSchedule {
    pub id: Uuid,
    pub masjid_id: Uuid,
    pub name: String,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Join row binding a content item into a schedule at a position.
///
/// `position` is a dense integer defining display order; ties are broken by
/// insertion order and are never intentionally created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContentScheduleItem {
    pub id: i64,
    pub schedule_id: Uuid,
    pub content_item_id: Uuid,
    pub position: i32,
}

/// Request to create a schedule.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateScheduleRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    /// Ordered content item ids; positions are assigned densely from 0.
    #[serde(default)]
    pub item_ids: Vec<Uuid>,
}

/// Request to update a schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateScheduleRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Full replacement of the ordered item list when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_ids: Option<Vec<Uuid>>,
}

/// Request to duplicate a schedule under a new name.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct DuplicateScheduleRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
}

/// Schedule with its ordered items, as returned to admins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScheduleWithItems {
    #[serde(flatten)]
    pub schedule: ContentSchedule,
    pub items: Vec<ContentScheduleItem>,
}
