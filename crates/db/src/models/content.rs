//! Generated caption content rows.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

use editoria_core::content::{CaptionSet, CaptionUsage, GeneratedContent};
use editoria_core::error::CoreError;
use editoria_core::types::{DbId, Timestamp};

/// A row from the `generated_content` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContentRow {
    pub id: DbId,
    pub calendar_id: DbId,
    pub media_id: Option<DbId>,
    pub captions: Json<CaptionSet>,
    pub hashtags: Vec<String>,
    pub model: Option<String>,
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub cost_usd: f64,
    pub generation_params: serde_json::Value,
    pub content_status: String,
    pub created_at: Timestamp,
}

impl TryFrom<ContentRow> for GeneratedContent {
    type Error = CoreError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            calendar_id: row.calendar_id,
            media_id: row.media_id,
            captions: row.captions.0,
            hashtags: row.hashtags,
            usage: CaptionUsage {
                model: row.model,
                input_tokens: row.input_tokens,
                output_tokens: row.output_tokens,
                cost_usd: row.cost_usd,
            },
            generation_params: row.generation_params,
            content_status: row.content_status,
            created_at: row.created_at,
        })
    }
}
