//! Masjid entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the masjids table.
#[derive(Debug, Clone, FromRow)]
pub struct MasjidEntity {
    pub id: Uuid,
    pub name: String,
    pub timezone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub calculation_method: String,
    pub madhab: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MasjidEntity> for domain::models::Masjid {
    fn from(entity: MasjidEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            timezone: entity.timezone,
            latitude: entity.latitude,
            longitude: entity.longitude,
            calculation_method: entity.calculation_method,
            madhab: entity.madhab,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
