//! Prayer time repository for database operations.
//!
//! Rows are loaded upstream; the core only reads the current day.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PrayerTimeEntity;

const PRAYER_COLUMNS: &str = "id, masjid_id, date, fajr, sunrise, dhuhr, asr, maghrib, isha";

/// Repository for prayer time database operations.
#[derive(Clone)]
pub struct PrayerTimeRepository {
    pool: PgPool,
}

impl PrayerTimeRepository {
    /// Creates a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The masjid's prayer times for a calendar day, if loaded.
    pub async fn find_for_day(
        &self,
        masjid_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<PrayerTimeEntity>, sqlx::Error> {
        let query = format!(
            "SELECT {PRAYER_COLUMNS} FROM prayer_times WHERE masjid_id = $1 AND date = $2"
        );
        sqlx::query_as::<_, PrayerTimeEntity>(&query)
            .bind(masjid_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await
    }
}
