//! Repository for the `calendar_entries` table.

use sqlx::types::Json;
use sqlx::PgPool;

use editoria_core::calendar::NewCalendarEntry;
use editoria_core::lifecycle::EntryStatus;
use editoria_core::publishing::PublishRecord;
use editoria_core::scoring::Score;
use editoria_core::types::{Date, DbId, Timestamp};

use crate::models::calendar::CalendarEntryRow;

const COLUMNS: &str = "id, post_date, slot_index, time_slot, rule_id, target_category, \
    target_format, season_context, theme_id, theme_name, media_id, manual_media_id, \
    media_score, score_breakdown, status, content_id, post_id, permalink, container_id, \
    scheduled_at, published_at, publish_error, created_at, updated_at";

/// Insert or replace the generated fields of a slot. Editor and publish
/// state from a previous run is reset along with them.
const UPSERT: &str = "INSERT INTO calendar_entries
        (post_date, slot_index, time_slot, rule_id, target_category, target_format,
         season_context, theme_id, theme_name, media_id, media_score, score_breakdown, status)
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
     ON CONFLICT ON CONSTRAINT uq_calendar_entries_date_slot DO UPDATE SET
        time_slot = EXCLUDED.time_slot,
        rule_id = EXCLUDED.rule_id,
        target_category = EXCLUDED.target_category,
        target_format = EXCLUDED.target_format,
        season_context = EXCLUDED.season_context,
        theme_id = EXCLUDED.theme_id,
        theme_name = EXCLUDED.theme_name,
        media_id = EXCLUDED.media_id,
        manual_media_id = NULL,
        media_score = EXCLUDED.media_score,
        score_breakdown = EXCLUDED.score_breakdown,
        status = EXCLUDED.status,
        content_id = NULL,
        post_id = NULL,
        permalink = NULL,
        container_id = NULL,
        scheduled_at = NULL,
        published_at = NULL,
        publish_error = NULL,
        updated_at = NOW()";

pub struct CalendarRepo;

impl CalendarRepo {
    /// Media ids (manual override first) assigned on or after `since`.
    pub async fn recently_used_media_ids(
        pool: &PgPool,
        since: Date,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT DISTINCT COALESCE(manual_media_id, media_id)
             FROM calendar_entries
             WHERE post_date >= $1 AND COALESCE(manual_media_id, media_id) IS NOT NULL",
        )
        .bind(since)
        .fetch_all(pool)
        .await
    }

    /// `(post_date, slot_index)` keys already stored in `[start, end]`.
    pub async fn existing_keys(
        pool: &PgPool,
        start: Date,
        end: Date,
    ) -> Result<Vec<(Date, i32)>, sqlx::Error> {
        sqlx::query_as::<_, (Date, i32)>(
            "SELECT post_date, slot_index FROM calendar_entries WHERE post_date BETWEEN $1 AND $2",
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// Upsert every entry in one transaction. Nothing is written if any
    /// row fails. Returns the number of rows written.
    pub async fn upsert_many(
        pool: &PgPool,
        entries: &[NewCalendarEntry],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut written = 0;
        for entry in entries {
            let result = sqlx::query(UPSERT)
                .bind(entry.post_date)
                .bind(entry.slot_index)
                .bind(&entry.time_slot)
                .bind(entry.rule_id)
                .bind(entry.target_category.map(|c| c.as_str()))
                .bind(entry.target_format.map(|f| f.as_str()))
                .bind(entry.season_context.as_str())
                .bind(entry.theme_id)
                .bind(&entry.theme_name)
                .bind(entry.media_id)
                .bind(entry.media_score)
                .bind(entry.score_breakdown.map(Json))
                .bind(entry.status.as_str())
                .execute(&mut *tx)
                .await?;
            written += result.rows_affected();
        }
        tx.commit().await?;
        Ok(written)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CalendarEntryRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM calendar_entries WHERE id = $1");
        sqlx::query_as::<_, CalendarEntryRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Entries in `[start, end]` ordered by date then slot, optionally
    /// filtered by status.
    pub async fn list_range(
        pool: &PgPool,
        start: Date,
        end: Date,
        status: Option<EntryStatus>,
    ) -> Result<Vec<CalendarEntryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calendar_entries
             WHERE post_date BETWEEN $1 AND $2 AND ($3::TEXT IS NULL OR status = $3)
             ORDER BY post_date, slot_index"
        );
        sqlx::query_as::<_, CalendarEntryRow>(&query)
            .bind(start)
            .bind(end)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(pool)
            .await
    }

    /// Returns `true` if a row was updated.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: EntryStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE calendar_entries SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set `published` and stamp `published_at`, keeping any post id or
    /// permalink from an earlier scheduling call.
    pub async fn mark_published(
        pool: &PgPool,
        id: DbId,
        at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE calendar_entries SET
                status = $2, published_at = $3, publish_error = NULL, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(EntryStatus::Published.as_str())
        .bind(at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Drop the content link and set `status`. The content row is kept.
    pub async fn clear_content(
        pool: &PgPool,
        id: DbId,
        status: EntryStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE calendar_entries SET content_id = NULL, status = $2, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a manual media override with its score.
    pub async fn update_media(
        pool: &PgPool,
        id: DbId,
        media_id: DbId,
        score: &Score,
        status: EntryStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE calendar_entries SET
                manual_media_id = $2, media_score = $3, score_breakdown = $4,
                status = $5, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(media_id)
        .bind(score.total)
        .bind(Json(score.breakdown))
        .bind(status.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a successful publish and clear any previous error.
    pub async fn record_publish(
        pool: &PgPool,
        id: DbId,
        status: EntryStatus,
        record: &PublishRecord,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE calendar_entries SET
                status = $2, post_id = $3, permalink = $4, container_id = $5,
                scheduled_at = $6, published_at = $7, publish_error = NULL, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(&record.receipt.post_id)
        .bind(&record.receipt.permalink)
        .bind(&record.receipt.container_id)
        .bind(record.scheduled_at)
        .bind(record.published_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set or clear `publish_error`.
    pub async fn set_publish_error(
        pool: &PgPool,
        id: DbId,
        error: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE calendar_entries SET publish_error = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Point an entry at a content row.
    pub async fn link_content(
        pool: &PgPool,
        id: DbId,
        content_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE calendar_entries SET content_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(content_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every entry in `[start, end]`. Returns the number removed.
    pub async fn delete_range(pool: &PgPool, start: Date, end: Date) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM calendar_entries WHERE post_date BETWEEN $1 AND $2")
            .bind(start)
            .bind(end)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
