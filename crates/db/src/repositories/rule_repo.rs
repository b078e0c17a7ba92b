//! Repository for the `posting_rules` table.

use sqlx::PgPool;

use editoria_core::rules::DEFAULT_MIN_QUALITY;
use editoria_core::types::DbId;

use crate::models::rule::{RuleRow, UpsertRule};

const COLUMNS: &str = "id, day_of_week, slot_index, default_category, preferred_format, \
    preferred_aspect_ratio, min_quality, preferred_time, is_active, notes, created_at, updated_at";

pub struct RuleRepo;

impl RuleRepo {
    /// All rules ordered by weekday then slot.
    pub async fn list(pool: &PgPool) -> Result<Vec<RuleRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posting_rules ORDER BY day_of_week, slot_index");
        sqlx::query_as::<_, RuleRow>(&query).fetch_all(pool).await
    }

    pub async fn list_active(pool: &PgPool) -> Result<Vec<RuleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posting_rules WHERE is_active ORDER BY day_of_week, slot_index"
        );
        sqlx::query_as::<_, RuleRow>(&query).fetch_all(pool).await
    }

    /// Insert the rule or replace the one at the same `(day_of_week, slot_index)`.
    pub async fn upsert(pool: &PgPool, input: &UpsertRule) -> Result<RuleRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO posting_rules
                (day_of_week, slot_index, default_category, preferred_format,
                 preferred_aspect_ratio, min_quality, preferred_time, is_active, notes)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, $10), $7, COALESCE($8, TRUE), $9)
             ON CONFLICT ON CONSTRAINT uq_posting_rules_day_slot DO UPDATE SET
                default_category = EXCLUDED.default_category,
                preferred_format = EXCLUDED.preferred_format,
                preferred_aspect_ratio = EXCLUDED.preferred_aspect_ratio,
                min_quality = EXCLUDED.min_quality,
                preferred_time = EXCLUDED.preferred_time,
                is_active = EXCLUDED.is_active,
                notes = EXCLUDED.notes,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RuleRow>(&query)
            .bind(input.day_of_week)
            .bind(input.slot_index)
            .bind(input.default_category.map(|c| c.as_str()))
            .bind(input.preferred_format.map(|f| f.as_str()))
            .bind(&input.preferred_aspect_ratio)
            .bind(input.min_quality)
            .bind(&input.preferred_time)
            .bind(input.is_active)
            .bind(&input.notes)
            .bind(DEFAULT_MIN_QUALITY)
            .fetch_one(pool)
            .await
    }

    /// Delete a rule. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posting_rules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
