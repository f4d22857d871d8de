//! Daily prayer-time read model.
//!
//! Rows are produced upstream (CSV upload / calculation library); the core
//! only reads the row for the current day when resolving screen content.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prayer times for one masjid on one calendar day. At most one row per
/// (masjid, day).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PrayerTimeDay {
    pub id: Uuid,
    pub masjid_id: Uuid,
    pub date: NaiveDate,
    pub fajr: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub dhuhr: DateTime<Utc>,
    pub asr: DateTime<Utc>,
    pub maghrib: DateTime<Utc>,
    pub isha: DateTime<Utc>,
}
