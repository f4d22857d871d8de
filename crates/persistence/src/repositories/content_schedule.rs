//! Content schedule repository for database operations.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::{ContentScheduleEntity, ScheduleItemEntity, ScheduledItemRow};

const SCHEDULE_COLUMNS: &str = "id, masjid_id, name, is_default, is_active, created_at, updated_at";

/// Repository for content schedule database operations.
#[derive(Clone)]
pub struct ContentScheduleRepository {
    pool: PgPool,
}

impl ContentScheduleRepository {
    /// Creates a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a schedule with its ordered items in one transaction.
    ///
    /// The partial unique index on (masjid_id) WHERE is_default turns a
    /// second default into a unique violation, surfaced as Conflict upstream.
    pub async fn create(
        &self,
        masjid_id: Uuid,
        name: &str,
        is_default: bool,
        item_ids: &[Uuid],
    ) -> Result<ContentScheduleEntity, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            INSERT INTO content_schedules (masjid_id, name, is_default)
            VALUES ($1, $2, $3)
            RETURNING {SCHEDULE_COLUMNS}
            "#,
        );
        let schedule = sqlx::query_as::<_, ContentScheduleEntity>(&query)
            .bind(masjid_id)
            .bind(name)
            .bind(is_default)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_items(&mut tx, schedule.id, masjid_id, item_ids).await?;

        tx.commit().await?;
        Ok(schedule)
    }

    /// Inserts items with dense positions from 0, verifying every item
    /// belongs to the same masjid (tenant isolation on the join).
    async fn insert_items(
        tx: &mut Transaction<'_, Postgres>,
        schedule_id: Uuid,
        masjid_id: Uuid,
        item_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        for (position, item_id) in item_ids.iter().enumerate() {
            let inserted = sqlx::query(
                r#"
                INSERT INTO content_schedule_items (schedule_id, content_item_id, position)
                SELECT $1, id, $3
                FROM content_items
                WHERE id = $2 AND masjid_id = $4
                "#,
            )
            .bind(schedule_id)
            .bind(item_id)
            .bind(position as i32)
            .bind(masjid_id)
            .execute(&mut **tx)
            .await?;

            if inserted.rows_affected() == 0 {
                return Err(sqlx::Error::RowNotFound);
            }
        }
        Ok(())
    }

    /// Find a schedule by id within a tenant.
    pub async fn find_for_masjid(
        &self,
        schedule_id: Uuid,
        masjid_id: Uuid,
    ) -> Result<Option<ContentScheduleEntity>, sqlx::Error> {
        let query = format!(
            "SELECT {SCHEDULE_COLUMNS} FROM content_schedules WHERE id = $1 AND masjid_id = $2"
        );
        sqlx::query_as::<_, ContentScheduleEntity>(&query)
            .bind(schedule_id)
            .bind(masjid_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// The masjid's default schedule, if any.
    pub async fn find_default(
        &self,
        masjid_id: Uuid,
    ) -> Result<Option<ContentScheduleEntity>, sqlx::Error> {
        let query = format!(
            "SELECT {SCHEDULE_COLUMNS} FROM content_schedules WHERE masjid_id = $1 AND is_default"
        );
        sqlx::query_as::<_, ContentScheduleEntity>(&query)
            .bind(masjid_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// List all schedules of a masjid.
    pub async fn list_for_masjid(
        &self,
        masjid_id: Uuid,
    ) -> Result<Vec<ContentScheduleEntity>, sqlx::Error> {
        let query = format!(
            "SELECT {SCHEDULE_COLUMNS} FROM content_schedules WHERE masjid_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, ContentScheduleEntity>(&query)
            .bind(masjid_id)
            .fetch_all(&self.pool)
            .await
    }

    /// Partial update of name/is_active, optionally replacing the full
    /// ordered item list, in one transaction.
    pub async fn update(
        &self,
        schedule_id: Uuid,
        masjid_id: Uuid,
        name: Option<&str>,
        is_active: Option<bool>,
        item_ids: Option<&[Uuid]>,
    ) -> Result<Option<ContentScheduleEntity>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            UPDATE content_schedules
            SET name = COALESCE($3, name),
                is_active = COALESCE($4, is_active),
                updated_at = NOW()
            WHERE id = $1 AND masjid_id = $2
            RETURNING {SCHEDULE_COLUMNS}
            "#,
        );
        let Some(schedule) = sqlx::query_as::<_, ContentScheduleEntity>(&query)
            .bind(schedule_id)
            .bind(masjid_id)
            .bind(name)
            .bind(is_active)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(item_ids) = item_ids {
            sqlx::query("DELETE FROM content_schedule_items WHERE schedule_id = $1")
                .bind(schedule_id)
                .execute(&mut *tx)
                .await?;
            Self::insert_items(&mut tx, schedule_id, masjid_id, item_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(schedule))
    }

    /// Atomically moves the default flag to this schedule: the previous
    /// default is cleared and the new one set inside one transaction.
    pub async fn set_default(
        &self,
        schedule_id: Uuid,
        masjid_id: Uuid,
    ) -> Result<Option<ContentScheduleEntity>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE content_schedules SET is_default = FALSE, updated_at = NOW() WHERE masjid_id = $1 AND is_default",
        )
        .bind(masjid_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            r#"
            UPDATE content_schedules
            SET is_default = TRUE, updated_at = NOW()
            WHERE id = $1 AND masjid_id = $2
            RETURNING {SCHEDULE_COLUMNS}
            "#,
        );
        let schedule = sqlx::query_as::<_, ContentScheduleEntity>(&query)
            .bind(schedule_id)
            .bind(masjid_id)
            .fetch_optional(&mut *tx)
            .await?;

        // Roll back the cleared flag when the target does not exist.
        if schedule.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(schedule)
    }

    /// Duplicates a schedule and its items under a new name. The copy is
    /// never the default.
    pub async fn duplicate(
        &self,
        schedule_id: Uuid,
        masjid_id: Uuid,
        new_name: &str,
    ) -> Result<Option<ContentScheduleEntity>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            INSERT INTO content_schedules (masjid_id, name, is_default, is_active)
            SELECT masjid_id, $3, FALSE, is_active
            FROM content_schedules
            WHERE id = $1 AND masjid_id = $2
            RETURNING {SCHEDULE_COLUMNS}
            "#,
        );
        let Some(copy) = sqlx::query_as::<_, ContentScheduleEntity>(&query)
            .bind(schedule_id)
            .bind(masjid_id)
            .bind(new_name)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query(
            r#"
            INSERT INTO content_schedule_items (schedule_id, content_item_id, position)
            SELECT $2, content_item_id, position
            FROM content_schedule_items
            WHERE schedule_id = $1
            ORDER BY position ASC, id ASC
            "#,
        )
        .bind(schedule_id)
        .bind(copy.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(copy))
    }

    /// Deletes a schedule, tenant-scoped. Join rows cascade; screens
    /// pointing at it fall back to the masjid default via ON DELETE SET NULL.
    pub async fn delete(&self, schedule_id: Uuid, masjid_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM content_schedules WHERE id = $1 AND masjid_id = $2")
            .bind(schedule_id)
            .bind(masjid_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// The schedule's join rows in display order.
    pub async fn find_items(
        &self,
        schedule_id: Uuid,
    ) -> Result<Vec<ScheduleItemEntity>, sqlx::Error> {
        sqlx::query_as::<_, ScheduleItemEntity>(
            r#"
            SELECT id, schedule_id, content_item_id, position
            FROM content_schedule_items
            WHERE schedule_id = $1
            ORDER BY position ASC, id ASC
            "#,
        )
        .bind(schedule_id)
        .fetch_all(&self.pool)
        .await
    }

    /// The schedule's items joined with their content, ordered by position
    /// with the join-row id as stable tie-break (insertion order).
    pub async fn find_items_with_content(
        &self,
        schedule_id: Uuid,
    ) -> Result<Vec<ScheduledItemRow>, sqlx::Error> {
        sqlx::query_as::<_, ScheduledItemRow>(
            r#"
            SELECT si.id AS row_id,
                   si.position,
                   ci.id AS item_id,
                   ci.masjid_id,
                   ci.content_type,
                   ci.title,
                   ci.content,
                   ci.duration_secs,
                   ci.is_active,
                   ci.start_date,
                   ci.end_date,
                   ci.created_at,
                   ci.updated_at
            FROM content_schedule_items si
            JOIN content_items ci ON ci.id = si.content_item_id
            WHERE si.schedule_id = $1
            ORDER BY si.position ASC, si.id ASC
            "#,
        )
        .bind(schedule_id)
        .fetch_all(&self.pool)
        .await
    }
}
