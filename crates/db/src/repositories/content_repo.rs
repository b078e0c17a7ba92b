//! Repository for the `generated_content` table.

use sqlx::types::Json;
use sqlx::PgPool;

use editoria_core::content::{NewContent, CONTENT_STATUS_DISCARDED, CONTENT_STATUS_DRAFT};
use editoria_core::types::DbId;

use crate::models::content::ContentRow;

const COLUMNS: &str = "id, calendar_id, media_id, captions, hashtags, model, input_tokens, \
    output_tokens, cost_usd, generation_params, content_status, created_at";

pub struct ContentRepo;

impl ContentRepo {
    /// Insert a draft content row, returning it.
    pub async fn create(pool: &PgPool, input: &NewContent) -> Result<ContentRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO generated_content
                (calendar_id, media_id, captions, hashtags, model, input_tokens,
                 output_tokens, cost_usd, generation_params, content_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentRow>(&query)
            .bind(input.calendar_id)
            .bind(input.media_id)
            .bind(Json(&input.captions))
            .bind(&input.hashtags)
            .bind(&input.usage.model)
            .bind(input.usage.input_tokens)
            .bind(input.usage.output_tokens)
            .bind(input.usage.cost_usd)
            .bind(&input.generation_params)
            .bind(CONTENT_STATUS_DRAFT)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ContentRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM generated_content WHERE id = $1");
        sqlx::query_as::<_, ContentRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Latest content row per calendar entry, discarded rows excluded.
    pub async fn latest_for_entries(
        pool: &PgPool,
        calendar_ids: &[DbId],
    ) -> Result<Vec<ContentRow>, sqlx::Error> {
        if calendar_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT DISTINCT ON (calendar_id) {COLUMNS} FROM generated_content
             WHERE calendar_id = ANY($1) AND content_status <> $2
             ORDER BY calendar_id, created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ContentRow>(&query)
            .bind(calendar_ids)
            .bind(CONTENT_STATUS_DISCARDED)
            .fetch_all(pool)
            .await
    }

    /// Mark every content row of an entry discarded. Returns the number
    /// of rows changed.
    pub async fn discard_for_entry(pool: &PgPool, calendar_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE generated_content SET content_status = $2
             WHERE calendar_id = $1 AND content_status <> $2",
        )
        .bind(calendar_id)
        .bind(CONTENT_STATUS_DISCARDED)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
