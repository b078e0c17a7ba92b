//! Repository for the `seasonal_themes` table.

use sqlx::PgPool;

use editoria_core::types::DbId;

use crate::models::theme::{CreateTheme, ThemeRow, UpdateTheme};

const COLUMNS: &str = "id, theme_name, season, start_date, end_date, priority, is_active, \
    preferred_ambiances, preferred_elements, cta_focus, editorial_tone, hashtags, \
    created_at, updated_at";

pub struct ThemeRepo;

impl ThemeRepo {
    /// All themes ordered by start date.
    pub async fn list(pool: &PgPool) -> Result<Vec<ThemeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM seasonal_themes ORDER BY start_date, id");
        sqlx::query_as::<_, ThemeRow>(&query).fetch_all(pool).await
    }

    pub async fn list_active(pool: &PgPool) -> Result<Vec<ThemeRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM seasonal_themes WHERE is_active ORDER BY start_date, id"
        );
        sqlx::query_as::<_, ThemeRow>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ThemeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM seasonal_themes WHERE id = $1");
        sqlx::query_as::<_, ThemeRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateTheme) -> Result<ThemeRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO seasonal_themes
                (theme_name, season, start_date, end_date, priority, is_active,
                 preferred_ambiances, preferred_elements, cta_focus, editorial_tone, hashtags)
             VALUES ($1, $2, $3, $4, COALESCE($5, 0), COALESCE($6, TRUE), $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ThemeRow>(&query)
            .bind(&input.theme_name)
            .bind(input.season.map(|s| s.as_str()))
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.priority)
            .bind(input.is_active)
            .bind(&input.preferred_ambiances)
            .bind(&input.preferred_elements)
            .bind(&input.cta_focus)
            .bind(&input.editorial_tone)
            .bind(&input.hashtags)
            .fetch_one(pool)
            .await
    }

    /// Update a theme. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTheme,
    ) -> Result<Option<ThemeRow>, sqlx::Error> {
        let query = format!(
            "UPDATE seasonal_themes SET
                theme_name = COALESCE($2, theme_name),
                season = COALESCE($3, season),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                priority = COALESCE($6, priority),
                is_active = COALESCE($7, is_active),
                preferred_ambiances = COALESCE($8, preferred_ambiances),
                preferred_elements = COALESCE($9, preferred_elements),
                cta_focus = COALESCE($10, cta_focus),
                editorial_tone = COALESCE($11, editorial_tone),
                hashtags = COALESCE($12, hashtags),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ThemeRow>(&query)
            .bind(id)
            .bind(&input.theme_name)
            .bind(input.season.map(|s| s.as_str()))
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.priority)
            .bind(input.is_active)
            .bind(&input.preferred_ambiances)
            .bind(&input.preferred_elements)
            .bind(&input.cta_focus)
            .bind(&input.editorial_tone)
            .bind(&input.hashtags)
            .fetch_optional(pool)
            .await
    }

    /// Delete a theme. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM seasonal_themes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
