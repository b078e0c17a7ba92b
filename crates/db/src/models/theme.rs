//! Seasonal theme rows and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use editoria_core::error::CoreError;
use editoria_core::season::Season;
use editoria_core::themes::{validate_theme, SeasonalTheme};
use editoria_core::types::{Date, DbId, Timestamp};

use super::parse_optional;

/// A row from the `seasonal_themes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ThemeRow {
    pub id: DbId,
    pub theme_name: String,
    pub season: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub priority: i32,
    pub is_active: bool,
    pub preferred_ambiances: Vec<String>,
    pub preferred_elements: Vec<String>,
    pub cta_focus: Option<String>,
    pub editorial_tone: Option<String>,
    pub hashtags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ThemeRow> for SeasonalTheme {
    type Error = CoreError;

    fn try_from(row: ThemeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            season: parse_optional("seasonal_themes", row.id, row.season.as_deref())?,
            theme_name: row.theme_name,
            start_date: row.start_date,
            end_date: row.end_date,
            priority: row.priority,
            is_active: row.is_active,
            preferred_ambiances: row.preferred_ambiances,
            preferred_elements: row.preferred_elements,
            cta_focus: row.cta_focus,
            editorial_tone: row.editorial_tone,
            hashtags: row.hashtags,
        })
    }
}

/// DTO for creating a theme.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTheme {
    pub theme_name: String,
    pub season: Option<Season>,
    pub start_date: Date,
    pub end_date: Date,
    /// Defaults to 0 if omitted.
    pub priority: Option<i32>,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
    #[serde(default)]
    pub preferred_ambiances: Vec<String>,
    #[serde(default)]
    pub preferred_elements: Vec<String>,
    pub cta_focus: Option<String>,
    pub editorial_tone: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl CreateTheme {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_theme(&SeasonalTheme {
            id: 0,
            theme_name: self.theme_name.clone(),
            season: self.season,
            start_date: self.start_date,
            end_date: self.end_date,
            priority: self.priority.unwrap_or(0),
            is_active: self.is_active.unwrap_or(true),
            preferred_ambiances: Vec::new(),
            preferred_elements: Vec::new(),
            cta_focus: None,
            editorial_tone: None,
            hashtags: Vec::new(),
        })
    }
}

/// DTO for updating a theme. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTheme {
    pub theme_name: Option<String>,
    pub season: Option<Season>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
    pub preferred_ambiances: Option<Vec<String>>,
    pub preferred_elements: Option<Vec<String>>,
    pub cta_focus: Option<String>,
    pub editorial_tone: Option<String>,
    pub hashtags: Option<Vec<String>>,
}

impl UpdateTheme {
    /// Apply the patch to `current` and validate the result.
    pub fn validate_against(&self, current: &SeasonalTheme) -> Result<(), CoreError> {
        let mut patched = current.clone();
        if let Some(name) = &self.theme_name {
            patched.theme_name = name.clone();
        }
        if let Some(start) = self.start_date {
            patched.start_date = start;
        }
        if let Some(end) = self.end_date {
            patched.end_date = end;
        }
        validate_theme(&patched)
    }
}
