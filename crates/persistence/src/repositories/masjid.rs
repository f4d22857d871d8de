//! Masjid repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::MasjidEntity;

const MASJID_COLUMNS: &str = "id, name, timezone, latitude, longitude, calculation_method, \
     madhab, created_at, updated_at";

/// Repository for masjid database operations.
#[derive(Clone)]
pub struct MasjidRepository {
    pool: PgPool,
}

impl MasjidRepository {
    /// Creates a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a masjid by id.
    pub async fn find_by_id(&self, masjid_id: Uuid) -> Result<Option<MasjidEntity>, sqlx::Error> {
        let query = format!("SELECT {MASJID_COLUMNS} FROM masjids WHERE id = $1");
        sqlx::query_as::<_, MasjidEntity>(&query)
            .bind(masjid_id)
            .fetch_optional(&self.pool)
            .await
    }
}
