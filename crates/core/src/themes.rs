//! Seasonal editorial themes and active-theme resolution.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::season::Season;
use crate::types::{Date, DbId};

/// CTA used for caption generation when no theme sets one.
pub const DEFAULT_CTA: &str = "link_bio";

/// A date-ranged editorial campaign that biases scoring and captions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalTheme {
    pub id: DbId,
    pub theme_name: String,
    pub season: Option<Season>,
    /// Inclusive.
    pub start_date: Date,
    /// Inclusive.
    pub end_date: Date,
    pub priority: i32,
    pub is_active: bool,
    pub preferred_ambiances: Vec<String>,
    pub preferred_elements: Vec<String>,
    pub cta_focus: Option<String>,
    pub editorial_tone: Option<String>,
    pub hashtags: Vec<String>,
}

impl SeasonalTheme {
    /// True when `date` falls inside `[start_date, end_date]`.
    pub fn covers(&self, date: Date) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// CTA focus for captions, falling back to [`DEFAULT_CTA`].
    pub fn cta(&self) -> &str {
        self.cta_focus.as_deref().unwrap_or(DEFAULT_CTA)
    }
}

/// Validate a theme's date range and name.
pub fn validate_theme(theme: &SeasonalTheme) -> Result<(), CoreError> {
    if theme.theme_name.trim().is_empty() {
        return Err(CoreError::Validation("Theme name must not be empty".into()));
    }
    if theme.start_date > theme.end_date {
        return Err(CoreError::Validation(format!(
            "Theme '{}': start date {} is after end date {}",
            theme.theme_name, theme.start_date, theme.end_date
        )));
    }
    Ok(())
}

/// Validate an inclusive date range (`start <= end`).
pub fn validate_date_range(start: Date, end: Date) -> Result<(), CoreError> {
    if start > end {
        return Err(CoreError::Validation(format!(
            "start date {start} is after end date {end}"
        )));
    }
    Ok(())
}

/// Pick the theme governing `date`.
///
/// Among active themes covering the date the highest priority wins; equal
/// priorities resolve to the lowest id so the result never depends on the
/// order of `themes`.
pub fn resolve_active_theme(themes: &[SeasonalTheme], date: Date) -> Option<&SeasonalTheme> {
    themes
        .iter()
        .filter(|t| t.is_active && t.covers(date))
        .min_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> Date {
        Date::from_ymd_opt(2026, m, d).unwrap()
    }

    fn theme(id: DbId, start: Date, end: Date, priority: i32) -> SeasonalTheme {
        SeasonalTheme {
            id,
            theme_name: format!("theme-{id}"),
            season: None,
            start_date: start,
            end_date: end,
            priority,
            is_active: true,
            preferred_ambiances: Vec::new(),
            preferred_elements: Vec::new(),
            cta_focus: None,
            editorial_tone: None,
            hashtags: Vec::new(),
        }
    }

    #[test]
    fn range_is_inclusive() {
        let t = theme(1, date(6, 1), date(6, 30), 0);
        assert!(t.covers(date(6, 1)));
        assert!(t.covers(date(6, 30)));
        assert!(!t.covers(date(7, 1)));
    }

    #[test]
    fn highest_priority_wins() {
        let themes = vec![
            theme(1, date(6, 1), date(8, 31), 1),
            theme(2, date(7, 1), date(7, 31), 5),
        ];
        assert_eq!(resolve_active_theme(&themes, date(7, 10)).unwrap().id, 2);
        assert_eq!(resolve_active_theme(&themes, date(6, 10)).unwrap().id, 1);
    }

    #[test]
    fn priority_tie_resolves_to_lowest_id_regardless_of_order() {
        let a = theme(7, date(1, 1), date(12, 31), 3);
        let b = theme(4, date(1, 1), date(12, 31), 3);
        let forward = vec![a.clone(), b.clone()];
        let reverse = vec![b, a];
        assert_eq!(resolve_active_theme(&forward, date(5, 5)).unwrap().id, 4);
        assert_eq!(resolve_active_theme(&reverse, date(5, 5)).unwrap().id, 4);
    }

    #[test]
    fn inactive_themes_ignored() {
        let mut t = theme(1, date(1, 1), date(12, 31), 9);
        t.is_active = false;
        assert!(resolve_active_theme(&[t], date(3, 3)).is_none());
    }

    #[test]
    fn inverted_range_rejected() {
        let t = theme(1, date(6, 30), date(6, 1), 0);
        let err = validate_theme(&t).unwrap_err();
        assert!(err.to_string().contains("after end date"));
    }

    #[test]
    fn cta_defaults_to_link_bio() {
        let mut t = theme(1, date(1, 1), date(1, 2), 0);
        assert_eq!(t.cta(), "link_bio");
        t.cta_focus = Some("booking".into());
        assert_eq!(t.cta(), "booking");
    }
}
