//! Repository for the `media_library` table.

use sqlx::PgPool;

use editoria_core::media::STATUS_ANALYZED;
use editoria_core::types::{DbId, Timestamp};

use crate::models::media::MediaRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, file_name, category, subcategory, ambiance, seasons, elements, \
    quality, aspect_ratio, media_type, used_count, last_used_at";

/// Read access to tagged media, plus usage bookkeeping.
pub struct MediaRepo;

impl MediaRepo {
    /// All assets that finished analysis, ordered by id.
    pub async fn list_eligible(pool: &PgPool) -> Result<Vec<MediaRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media_library WHERE status = $1 ORDER BY id");
        sqlx::query_as::<_, MediaRow>(&query)
            .bind(STATUS_ANALYZED)
            .fetch_all(pool)
            .await
    }

    /// Find an asset by id, whatever its ingestion status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MediaRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media_library WHERE id = $1");
        sqlx::query_as::<_, MediaRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<MediaRow>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM media_library WHERE id = ANY($1)");
        sqlx::query_as::<_, MediaRow>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Increment `used_count` and stamp `last_used_at`. Returns `true` if a
    /// row was updated.
    pub async fn record_usage(pool: &PgPool, id: DbId, at: Timestamp) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE media_library
             SET used_count = used_count + 1, last_used_at = $2, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
