//! Media library rows.

use serde::Serialize;
use sqlx::FromRow;

use editoria_core::error::CoreError;
use editoria_core::media::{Category, MediaAsset, MediaKind};
use editoria_core::season::Season;
use editoria_core::types::{DbId, Timestamp};

use super::parse_column;

/// A row from the `media_library` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MediaRow {
    pub id: DbId,
    pub file_name: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub ambiance: Vec<String>,
    pub seasons: Vec<String>,
    pub elements: Vec<String>,
    pub quality: i16,
    pub aspect_ratio: Option<String>,
    pub media_type: String,
    pub used_count: i32,
    pub last_used_at: Option<Timestamp>,
}

impl TryFrom<MediaRow> for MediaAsset {
    type Error = CoreError;

    /// Unknown season tags are dropped with a warning; tags come from an
    /// automated tagger and a stray value should not hide the asset.
    fn try_from(row: MediaRow) -> Result<Self, Self::Error> {
        let category: Category = parse_column("media_library", row.id, &row.category)?;
        let kind: MediaKind = parse_column("media_library", row.id, &row.media_type)?;

        let seasons = row
            .seasons
            .iter()
            .filter_map(|tag| match tag.parse::<Season>() {
                Ok(season) => Some(season),
                Err(_) => {
                    tracing::warn!(media_id = row.id, tag = %tag, "Ignoring unknown season tag");
                    None
                }
            })
            .collect();

        let mut asset = MediaAsset::new(row.id, category, kind, row.quality)
            .with_usage(row.used_count, row.last_used_at);
        asset.subcategory = row.subcategory;
        asset.ambiance = row.ambiance;
        asset.seasons = seasons;
        asset.elements = row.elements;
        asset.aspect_ratio = row.aspect_ratio;
        asset.file_name = row.file_name;
        Ok(asset)
    }
}
