//! Prayer time entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the prayer_times table.
#[derive(Debug, Clone, FromRow)]
pub struct PrayerTimeEntity {
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

impl From<PrayerTimeEntity> for domain::models::PrayerTimeDay {
    fn from(entity: PrayerTimeEntity) -> Self {
        Self {
            id: entity.id,
            masjid_id: entity.masjid_id,
            date: entity.date,
            fajr: entity.fajr,
            sunrise: entity.sunrise,
            dhuhr: entity.dhuhr,
            asr: entity.asr,
            maghrib: entity.maghrib,
            isha: entity.isha,
        }
    }
}
