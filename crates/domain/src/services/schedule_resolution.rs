//! Schedule resolution: "what should this screen show right now".
//!
//! The persistence layer hands this service the raw schedule rows; everything
//! here is pure so the ordering and eligibility rules can be tested without a
//! database. The HTTP layer assembles the final snapshot from the resolved
//! items plus the day's prayer times and per-screen overrides.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::content_item::ContentItem;
use crate::models::masjid::MasjidInfo;
use crate::models::prayer_time::PrayerTimeDay;
use crate::models::screen::Orientation;

/// A schedule row joined with its content item, as loaded from the store.
#[derive(Debug, Clone)]
pub struct ScheduledItem {
    /// Join-row id, used as the stable tie-break (insertion order).
    pub row_id: i64,
    /// Display position within the schedule.
    pub position: i32,
    pub item: ContentItem,
}

/// Orders scheduled items by position (insertion order on ties) and drops
/// items outside their eligibility window at `now`.
///
/// Eligibility is evaluated against the instant of resolution, not load time;
/// callers pass `Utc::now()` taken per request.
pub fn resolve_items(mut scheduled: Vec<ScheduledItem>, now: DateTime<Utc>) -> Vec<ContentItem> {
    scheduled.sort_by_key(|s| (s.position, s.row_id));
    scheduled
        .into_iter()
        .filter(|s| s.item.is_eligible(now))
        .map(|s| s.item)
        .collect()
}

/// Screen fields the renderer needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolvedScreen {
    pub id: Uuid,
    pub name: String,
    pub orientation: Orientation,
    pub content_config: serde_json::Value,
}

/// The effective schedule with its eligible, ordered items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolvedSchedule {
    pub id: Uuid,
    pub name: String,
    pub is_default: bool,
    pub items: Vec<ContentItem>,
}

/// Full content snapshot returned to a device.
///
/// Internally consistent at a single instant but assembled from separate
/// reads (schedule, prayer times, overrides) without transactional isolation;
/// a concurrent admin edit may show up in one sub-read and not another. This
/// eventual consistency is accepted by design.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolvedContent {
    pub screen: ResolvedScreen,
    pub masjid: MasjidInfo,
    /// None when neither a screen override nor a masjid default schedule
    /// resolves; an empty playlist, not an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ResolvedSchedule>,
    /// Today's row, or null when absent.
    pub prayer_times: Option<PrayerTimeDay>,
    /// Opaque per-screen overrides, passed through verbatim.
    pub content_overrides: serde_json::Value,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content_item::ContentType;
    use chrono::Duration;

    fn item(title: &str) -> ContentItem {
        ContentItem {
            id: Uuid::new_v4(),
            masjid_id: Uuid::new_v4(),
            content_type: ContentType::Announcement,
            title: title.to_string(),
            content: serde_json::json!({}),
            duration_secs: 10,
            is_active: true,
            start_date: None,
            end_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn scheduled(row_id: i64, position: i32, item: ContentItem) -> ScheduledItem {
        ScheduledItem {
            row_id,
            position,
            item,
        }
    }

    #[test]
    fn test_resolve_orders_by_position() {
        let now = Utc::now();
        let input = vec![
            scheduled(1, 2, item("Hadith")),
            scheduled(2, 0, item("Announcement")),
            scheduled(3, 1, item("Event")),
        ];

        let resolved = resolve_items(input, now);
        let titles: Vec<_> = resolved.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Announcement", "Event", "Hadith"]);
    }

    #[test]
    fn test_resolve_ties_break_by_insertion_order() {
        let now = Utc::now();
        let input = vec![
            scheduled(9, 0, item("second")),
            scheduled(3, 0, item("first")),
        ];

        let resolved = resolve_items(input, now);
        let titles: Vec<_> = resolved.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
    }

    #[test]
    fn test_resolve_filters_expired_items() {
        let now = Utc::now();
        let mut expired = item("expired");
        expired.end_date = Some(now - Duration::hours(1));

        let input = vec![scheduled(1, 0, expired), scheduled(2, 1, item("live"))];

        let resolved = resolve_items(input, now);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].title, "live");
    }

    #[test]
    fn test_resolve_filters_not_yet_started_items() {
        let now = Utc::now();
        let mut upcoming = item("upcoming");
        upcoming.start_date = Some(now + Duration::days(1));

        let resolved = resolve_items(vec![scheduled(1, 0, upcoming)], now);
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_resolve_keeps_items_inside_window() {
        let now = Utc::now();
        let mut windowed = item("windowed");
        windowed.start_date = Some(now - Duration::hours(1));
        windowed.end_date = Some(now + Duration::hours(1));

        let resolved = resolve_items(vec![scheduled(1, 0, windowed)], now);
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn test_resolve_filters_inactive_items() {
        let now = Utc::now();
        let mut inactive = item("inactive");
        inactive.is_active = false;

        let resolved = resolve_items(vec![scheduled(1, 0, inactive)], now);
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_resolve_empty_input() {
        assert!(resolve_items(vec![], Utc::now()).is_empty());
    }

    #[test]
    fn test_resolved_content_serializes_null_prayer_times() {
        let content = ResolvedContent {
            screen: ResolvedScreen {
                id: Uuid::new_v4(),
                name: "Main Hall".to_string(),
                orientation: Orientation::Landscape,
                content_config: serde_json::json!({}),
            },
            masjid: MasjidInfo {
                name: "Masjid An-Nur".to_string(),
                timezone: "Europe/London".to_string(),
            },
            schedule: None,
            prayer_times: None,
            content_overrides: serde_json::json!({}),
            last_updated: Utc::now(),
        };

        let json = serde_json::to_value(&content).unwrap();
        assert!(json["prayer_times"].is_null());
        assert!(json.get("schedule").is_none());
    }
}
