//! Calendar entry rows.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

use editoria_core::calendar::CalendarEntry;
use editoria_core::error::CoreError;
use editoria_core::scoring::ScoreBreakdown;
use editoria_core::types::{Date, DbId, Timestamp};

use super::{parse_column, parse_optional};

/// A row from the `calendar_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CalendarEntryRow {
    pub id: DbId,
    pub post_date: Date,
    pub slot_index: i32,
    pub time_slot: Option<String>,
    pub rule_id: Option<DbId>,
    pub target_category: Option<String>,
    pub target_format: Option<String>,
    pub season_context: Option<String>,
    pub theme_id: Option<DbId>,
    pub theme_name: Option<String>,
    pub media_id: Option<DbId>,
    pub manual_media_id: Option<DbId>,
    pub media_score: Option<f64>,
    pub score_breakdown: Option<Json<ScoreBreakdown>>,
    pub status: String,
    pub content_id: Option<DbId>,
    pub post_id: Option<String>,
    pub permalink: Option<String>,
    pub container_id: Option<String>,
    pub scheduled_at: Option<Timestamp>,
    pub published_at: Option<Timestamp>,
    pub publish_error: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<CalendarEntryRow> for CalendarEntry {
    type Error = CoreError;

    fn try_from(row: CalendarEntryRow) -> Result<Self, Self::Error> {
        const TABLE: &str = "calendar_entries";
        Ok(Self {
            id: row.id,
            post_date: row.post_date,
            slot_index: row.slot_index,
            time_slot: row.time_slot,
            rule_id: row.rule_id,
            target_category: parse_optional(TABLE, row.id, row.target_category.as_deref())?,
            target_format: parse_optional(TABLE, row.id, row.target_format.as_deref())?,
            season_context: parse_optional(TABLE, row.id, row.season_context.as_deref())?,
            theme_id: row.theme_id,
            theme_name: row.theme_name,
            media_id: row.media_id,
            manual_media_id: row.manual_media_id,
            media_score: row.media_score,
            score_breakdown: row.score_breakdown.map(|Json(b)| b),
            status: parse_column(TABLE, row.id, &row.status)?,
            content_id: row.content_id,
            post_id: row.post_id,
            permalink: row.permalink,
            container_id: row.container_id,
            scheduled_at: row.scheduled_at,
            published_at: row.published_at,
            publish_error: row.publish_error,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
