//! Posting rule rows and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use editoria_core::error::CoreError;
use editoria_core::media::Category;
use editoria_core::rules::{validate_rule, PostFormat, PostingRule, DEFAULT_MIN_QUALITY};
use editoria_core::types::{DbId, Timestamp};

use super::parse_optional;

/// A row from the `posting_rules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RuleRow {
    pub id: DbId,
    pub day_of_week: i16,
    pub slot_index: i32,
    pub default_category: Option<String>,
    pub preferred_format: Option<String>,
    pub preferred_aspect_ratio: Option<String>,
    pub min_quality: Option<i16>,
    pub preferred_time: Option<String>,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<RuleRow> for PostingRule {
    type Error = CoreError;

    fn try_from(row: RuleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            day_of_week: row.day_of_week,
            slot_index: row.slot_index,
            default_category: parse_optional(
                "posting_rules",
                row.id,
                row.default_category.as_deref(),
            )?,
            preferred_format: parse_optional(
                "posting_rules",
                row.id,
                row.preferred_format.as_deref(),
            )?,
            preferred_aspect_ratio: row.preferred_aspect_ratio,
            min_quality: row.min_quality,
            preferred_time: row.preferred_time,
            is_active: row.is_active,
            notes: row.notes,
        })
    }
}

/// DTO for inserting or replacing the rule at `(day_of_week, slot_index)`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertRule {
    pub day_of_week: i16,
    pub slot_index: i32,
    pub default_category: Option<Category>,
    pub preferred_format: Option<PostFormat>,
    pub preferred_aspect_ratio: Option<String>,
    /// Defaults to 6 if omitted.
    pub min_quality: Option<i16>,
    pub preferred_time: Option<String>,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

impl UpsertRule {
    /// Validate with the same checks applied when rules are loaded.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_rule(&PostingRule {
            id: 0,
            day_of_week: self.day_of_week,
            slot_index: self.slot_index,
            default_category: self.default_category,
            preferred_format: self.preferred_format,
            preferred_aspect_ratio: self.preferred_aspect_ratio.clone(),
            min_quality: Some(self.min_quality.unwrap_or(DEFAULT_MIN_QUALITY)),
            preferred_time: self.preferred_time.clone(),
            is_active: self.is_active.unwrap_or(true),
            notes: None,
        })
    }
}
