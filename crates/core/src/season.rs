//! Seasons and month-based season detection.
//!
//! Seasons follow a fixed month table (meteorological seasons), never
//! astronomical dates, so the same post date always resolves to the same
//! season.

use chrono::Datelike;

use crate::types::Date;

define_str_enum! {
    /// Season tag carried by media assets and seasonal themes.
    Season("season") {
        Spring = "spring",
        Summer = "summer",
        Autumn = "autumn",
        Winter = "winter",
        /// Matches any season with reduced weight during scoring.
        AllSeason = "all_season" | "all-season",
    }
}

/// Season for a calendar month (1 = January).
///
/// Months outside `1..=12` are impossible for a valid [`Date`]; they fall
/// back to winter.
pub fn season_for_month(month: u32) -> Season {
    match month {
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        9..=11 => Season::Autumn,
        _ => Season::Winter,
    }
}

/// Season in effect on `date`.
pub fn season_for_date(date: Date) -> Season {
    season_for_month(date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_table_matches_meteorological_seasons() {
        let expected = [
            (1, Season::Winter),
            (2, Season::Winter),
            (3, Season::Spring),
            (4, Season::Spring),
            (5, Season::Spring),
            (6, Season::Summer),
            (7, Season::Summer),
            (8, Season::Summer),
            (9, Season::Autumn),
            (10, Season::Autumn),
            (11, Season::Autumn),
            (12, Season::Winter),
        ];
        for (month, season) in expected {
            assert_eq!(season_for_month(month), season, "month {month}");
        }
    }

    #[test]
    fn season_for_date_uses_month() {
        let date = Date::from_ymd_opt(2026, 12, 31).unwrap();
        assert_eq!(season_for_date(date), Season::Winter);
    }

    #[test]
    fn all_season_accepts_hyphenated_alias() {
        assert_eq!("all-season".parse::<Season>().unwrap(), Season::AllSeason);
        assert_eq!("all_season".parse::<Season>().unwrap(), Season::AllSeason);
        assert_eq!(Season::AllSeason.as_str(), "all_season");
    }

    #[test]
    fn unknown_season_rejected() {
        let err = "monsoon".parse::<Season>().unwrap_err();
        assert!(err.to_string().contains("Invalid season"));
    }
}
