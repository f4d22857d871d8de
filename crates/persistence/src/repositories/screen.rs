//! Screen repository for database operations.
//!
//! Every lifecycle transition is a single conditional UPDATE so that
//! concurrent requests serialize at the store: two claims racing on the same
//! pairing code resolve with exactly one winner, the loser's UPDATE matches
//! zero rows.

use chrono::{DateTime, Utc};
use domain::models::screen::{Orientation, ScreenStatus};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ScreenEntity;

const SCREEN_COLUMNS: &str = "id, masjid_id, name, api_key, pairing_code, pairing_code_expires_at, \
     claimed_code, claimed_code_expires_at, status, is_active, last_seen_at, orientation, \
     device_type, location, schedule_id, content_config, content_overrides, created_at, updated_at";

/// Repository for screen-related database operations.
#[derive(Clone)]
pub struct ScreenRepository {
    pool: PgPool,
}

impl ScreenRepository {
    /// Creates a new ScreenRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a new unpaired screen holding a fresh pairing code.
    ///
    /// Fails with a unique violation if the code collides with a live one;
    /// the caller retries with a new code.
    pub async fn create_unpaired(
        &self,
        pairing_code: &str,
        expires_at: DateTime<Utc>,
        device_type: Option<&str>,
        orientation: Orientation,
    ) -> Result<ScreenEntity, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO screens (pairing_code, pairing_code_expires_at, device_type, orientation, status, is_active)
            VALUES ($1, $2, $3, $4, 'PAIRING', FALSE)
            RETURNING {SCREEN_COLUMNS}
            "#,
        );
        sqlx::query_as::<_, ScreenEntity>(&query)
            .bind(pairing_code)
            .bind(expires_at)
            .bind(device_type)
            .bind(orientation)
            .fetch_one(&self.pool)
            .await
    }

    /// Deletes abandoned unpaired rows whose pairing code has expired.
    ///
    /// Unpaired rows are created by the unauthenticated bootstrap endpoint
    /// and hold their code in the live-code unique index; once the code
    /// expires the row can never be claimed, so it is removed rather than
    /// left to accumulate. There is no background job, callers invoke this
    /// opportunistically.
    pub async fn purge_expired_unpaired(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM screens WHERE is_active = FALSE AND pairing_code_expires_at <= NOW()",
        )
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Find a screen by its live (unexpired, unclaimed) pairing code.
    pub async fn find_by_live_code(
        &self,
        pairing_code: &str,
    ) -> Result<Option<ScreenEntity>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {SCREEN_COLUMNS}
            FROM screens
            WHERE pairing_code = $1 AND pairing_code_expires_at > NOW()
            "#,
        );
        sqlx::query_as::<_, ScreenEntity>(&query)
            .bind(pairing_code)
            .fetch_optional(&self.pool)
            .await
    }

    /// Find a claimed screen by the code it was claimed under, while the
    /// original code validity window is still open. This is how a polling
    /// device retrieves its API key after the admin claim cleared the live
    /// code.
    pub async fn find_by_claimed_code(
        &self,
        pairing_code: &str,
    ) -> Result<Option<ScreenEntity>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {SCREEN_COLUMNS}
            FROM screens
            WHERE claimed_code = $1 AND claimed_code_expires_at > NOW()
            "#,
        );
        sqlx::query_as::<_, ScreenEntity>(&query)
            .bind(pairing_code)
            .fetch_optional(&self.pool)
            .await
    }

    /// The canonical claim transition: binds the screen to a masjid, issues
    /// its API key, and activates it, all in one atomic conditional update.
    ///
    /// The live pairing code moves to claimed_code (keeping its original
    /// expiry) so the device can still fetch the key by code; pairing_code
    /// itself is cleared. Returns None when no row matched the precondition,
    /// which covers unknown, expired, and already-claimed codes alike.
    pub async fn claim(
        &self,
        pairing_code: &str,
        masjid_id: Uuid,
        name: &str,
        location: Option<&str>,
        api_key: &str,
    ) -> Result<Option<ScreenEntity>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE screens
            SET masjid_id = $2,
                name = $3,
                location = $4,
                api_key = $5,
                is_active = TRUE,
                status = 'ONLINE',
                claimed_code = pairing_code,
                claimed_code_expires_at = pairing_code_expires_at,
                pairing_code = NULL,
                pairing_code_expires_at = NULL,
                updated_at = NOW()
            WHERE pairing_code = $1
              AND pairing_code_expires_at > NOW()
              AND is_active = FALSE
            RETURNING {SCREEN_COLUMNS}
            "#,
        );
        sqlx::query_as::<_, ScreenEntity>(&query)
            .bind(pairing_code)
            .bind(masjid_id)
            .bind(name)
            .bind(location)
            .bind(api_key)
            .fetch_optional(&self.pool)
            .await
    }

    /// Device-side acknowledgement of a completed claim (deprecated pairing
    /// path). Consumes the claimed code, marks the screen seen, and returns
    /// None when the code does not belong to a claimed, active screen.
    pub async fn complete_pairing(
        &self,
        pairing_code: &str,
    ) -> Result<Option<ScreenEntity>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE screens
            SET status = 'ONLINE',
                last_seen_at = NOW(),
                claimed_code = NULL,
                claimed_code_expires_at = NULL,
                updated_at = NOW()
            WHERE claimed_code = $1
              AND claimed_code_expires_at > NOW()
              AND is_active = TRUE
            RETURNING {SCREEN_COLUMNS}
            "#,
        );
        sqlx::query_as::<_, ScreenEntity>(&query)
            .bind(pairing_code)
            .fetch_optional(&self.pool)
            .await
    }

    /// Refreshes last_seen_at and stored status to "seen now / ONLINE".
    ///
    /// Called from device authentication as its documented side effect.
    /// Returns the number of rows touched (0 when the screen is gone or
    /// inactive).
    pub async fn touch_seen(&self, screen_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE screens
            SET last_seen_at = NOW(), status = 'ONLINE', updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(screen_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Records a heartbeat: last_seen_at, reported status (ONLINE when the
    /// device reports none), and device metrics shallow-merged into
    /// content_config.
    pub async fn record_heartbeat(
        &self,
        screen_id: Uuid,
        status: ScreenStatus,
        metrics: Option<&serde_json::Value>,
    ) -> Result<u64, sqlx::Error> {
        let merge = metrics.cloned().unwrap_or_else(|| serde_json::json!({}));
        let result = sqlx::query(
            r#"
            UPDATE screens
            SET last_seen_at = NOW(),
                status = $2,
                content_config = COALESCE(content_config, '{}'::jsonb) || $3,
                updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(screen_id)
        .bind(status)
        .bind(merge)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Find a screen by id.
    pub async fn find_by_id(&self, screen_id: Uuid) -> Result<Option<ScreenEntity>, sqlx::Error> {
        let query = format!("SELECT {SCREEN_COLUMNS} FROM screens WHERE id = $1");
        sqlx::query_as::<_, ScreenEntity>(&query)
            .bind(screen_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Find a screen by id within a tenant.
    pub async fn find_for_masjid(
        &self,
        screen_id: Uuid,
        masjid_id: Uuid,
    ) -> Result<Option<ScreenEntity>, sqlx::Error> {
        let query = format!("SELECT {SCREEN_COLUMNS} FROM screens WHERE id = $1 AND masjid_id = $2");
        sqlx::query_as::<_, ScreenEntity>(&query)
            .bind(screen_id)
            .bind(masjid_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// List all screens belonging to a masjid, sorted by name.
    pub async fn list_for_masjid(&self, masjid_id: Uuid) -> Result<Vec<ScreenEntity>, sqlx::Error> {
        let query = format!(
            "SELECT {SCREEN_COLUMNS} FROM screens WHERE masjid_id = $1 ORDER BY name ASC"
        );
        sqlx::query_as::<_, ScreenEntity>(&query)
            .bind(masjid_id)
            .fetch_all(&self.pool)
            .await
    }

    /// Partial update of admin-editable fields, tenant-scoped.
    pub async fn update(
        &self,
        screen_id: Uuid,
        masjid_id: Uuid,
        name: Option<&str>,
        orientation: Option<Orientation>,
        location: Option<&str>,
    ) -> Result<Option<ScreenEntity>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE screens
            SET name = COALESCE($3, name),
                orientation = COALESCE($4, orientation),
                location = COALESCE($5, location),
                updated_at = NOW()
            WHERE id = $1 AND masjid_id = $2
            RETURNING {SCREEN_COLUMNS}
            "#,
        );
        sqlx::query_as::<_, ScreenEntity>(&query)
            .bind(screen_id)
            .bind(masjid_id)
            .bind(name)
            .bind(orientation)
            .bind(location)
            .fetch_optional(&self.pool)
            .await
    }

    /// Sets or clears the per-screen schedule override, tenant-scoped.
    pub async fn assign_schedule(
        &self,
        screen_id: Uuid,
        masjid_id: Uuid,
        schedule_id: Option<Uuid>,
    ) -> Result<Option<ScreenEntity>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE screens
            SET schedule_id = $3, updated_at = NOW()
            WHERE id = $1 AND masjid_id = $2
            RETURNING {SCREEN_COLUMNS}
            "#,
        );
        sqlx::query_as::<_, ScreenEntity>(&query)
            .bind(screen_id)
            .bind(masjid_id)
            .bind(schedule_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Hard-deletes a screen. Tenant isolation is enforced in the WHERE
    /// clause; returns 0 when the screen does not belong to the masjid.
    pub async fn delete(&self, screen_id: Uuid, masjid_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM screens WHERE id = $1 AND masjid_id = $2")
            .bind(screen_id)
            .bind(masjid_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
