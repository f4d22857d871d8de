//! Content item repository for database operations.

use domain::models::ContentType;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ContentItemEntity;

const ITEM_COLUMNS: &str = "id, masjid_id, content_type, title, content, duration_secs, \
     is_active, start_date, end_date, created_at, updated_at";

/// Repository for content item database operations.
#[derive(Clone)]
pub struct ContentItemRepository {
    pool: PgPool,
}

impl ContentItemRepository {
    /// Creates a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a content item for a masjid.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        masjid_id: Uuid,
        content_type: ContentType,
        title: &str,
        content: &serde_json::Value,
        duration_secs: i32,
        is_active: bool,
        start_date: Option<chrono::DateTime<chrono::Utc>>,
        end_date: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<ContentItemEntity, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO content_items (masjid_id, content_type, title, content, duration_secs, is_active, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ITEM_COLUMNS}
            "#,
        );
        sqlx::query_as::<_, ContentItemEntity>(&query)
            .bind(masjid_id)
            .bind(content_type)
            .bind(title)
            .bind(content)
            .bind(duration_secs)
            .bind(is_active)
            .bind(start_date)
            .bind(end_date)
            .fetch_one(&self.pool)
            .await
    }

    /// Find a content item by id within a tenant.
    pub async fn find_for_masjid(
        &self,
        item_id: Uuid,
        masjid_id: Uuid,
    ) -> Result<Option<ContentItemEntity>, sqlx::Error> {
        let query =
            format!("SELECT {ITEM_COLUMNS} FROM content_items WHERE id = $1 AND masjid_id = $2");
        sqlx::query_as::<_, ContentItemEntity>(&query)
            .bind(item_id)
            .bind(masjid_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// List a masjid's content items, optionally filtered by type.
    pub async fn list_for_masjid(
        &self,
        masjid_id: Uuid,
        content_type: Option<ContentType>,
    ) -> Result<Vec<ContentItemEntity>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM content_items
            WHERE masjid_id = $1 AND ($2::content_type IS NULL OR content_type = $2)
            ORDER BY created_at DESC
            "#,
        );
        sqlx::query_as::<_, ContentItemEntity>(&query)
            .bind(masjid_id)
            .bind(content_type)
            .fetch_all(&self.pool)
            .await
    }

    /// Partial update of an item, tenant-scoped. Each window bound is
    /// tri-state: untouched when absent, cleared when the caller sends null,
    /// replaced otherwise.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        item_id: Uuid,
        masjid_id: Uuid,
        title: Option<&str>,
        content: Option<&serde_json::Value>,
        duration_secs: Option<i32>,
        is_active: Option<bool>,
        start_date: Option<Option<chrono::DateTime<chrono::Utc>>>,
        end_date: Option<Option<chrono::DateTime<chrono::Utc>>>,
    ) -> Result<Option<ContentItemEntity>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE content_items
            SET title = COALESCE($3, title),
                content = COALESCE($4, content),
                duration_secs = COALESCE($5, duration_secs),
                is_active = COALESCE($6, is_active),
                start_date = CASE WHEN $7 THEN $8 ELSE start_date END,
                end_date = CASE WHEN $9 THEN $10 ELSE end_date END,
                updated_at = NOW()
            WHERE id = $1 AND masjid_id = $2
            RETURNING {ITEM_COLUMNS}
            "#,
        );
        sqlx::query_as::<_, ContentItemEntity>(&query)
            .bind(item_id)
            .bind(masjid_id)
            .bind(title)
            .bind(content)
            .bind(duration_secs)
            .bind(is_active)
            .bind(start_date.is_some())
            .bind(start_date.flatten())
            .bind(end_date.is_some())
            .bind(end_date.flatten())
            .fetch_optional(&self.pool)
            .await
    }

    /// Deletes a content item, tenant-scoped. Schedule join rows cascade.
    pub async fn delete(&self, item_id: Uuid, masjid_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM content_items WHERE id = $1 AND masjid_id = $2")
            .bind(item_id)
            .bind(masjid_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
