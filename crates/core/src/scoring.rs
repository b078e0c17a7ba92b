//! Media scoring against a slot's requirements.
//!
//! Six dimensions, 100 points at the default weights:
//!
//! | dimension | points | rule |
//! |-----------|--------|------|
//! | category  | 25 | exact match only |
//! | season    | 20 | exact match, 12 for `all_season` |
//! | quality   | 20 | `quality / 10 * 20` |
//! | freshness | 20 | 20 if never used, else ramp 4 → 18 over 30 days |
//! | theme     | 10 | share of the theme's tags found on the asset |
//! | format    |  5 | aspect ratio fits the target format |
//!
//! Pure and deterministic: "today" is an argument.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::media::{Category, MediaAsset, MAX_QUALITY};
use crate::rules::PostFormat;
use crate::season::Season;
use crate::themes::SeasonalTheme;
use crate::types::Date;

// ---------------------------------------------------------------------------
// Dimension names
// ---------------------------------------------------------------------------

pub const DIM_CATEGORY: &str = "category";
pub const DIM_SEASON: &str = "season";
pub const DIM_QUALITY: &str = "quality";
pub const DIM_FRESHNESS: &str = "freshness";
pub const DIM_THEME: &str = "theme";
pub const DIM_FORMAT: &str = "format";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What a slot asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTarget {
    pub category: Option<Category>,
    pub season: Season,
    pub format: Option<PostFormat>,
}

/// Points awarded per dimension. Serialized as a `{dimension: points}` map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub category: f64,
    pub season: f64,
    pub quality: f64,
    pub freshness: f64,
    pub theme: f64,
    pub format: f64,
}

impl ScoreBreakdown {
    /// Sum of all dimensions, rounded to 2 decimals.
    pub fn total(&self) -> f64 {
        round2(self.dimensions().iter().map(|(_, points)| points).sum())
    }

    /// `(dimension name, points)` pairs in a fixed order.
    pub fn dimensions(&self) -> [(&'static str, f64); 6] {
        [
            (DIM_CATEGORY, self.category),
            (DIM_SEASON, self.season),
            (DIM_QUALITY, self.quality),
            (DIM_FRESHNESS, self.freshness),
            (DIM_THEME, self.theme),
            (DIM_FORMAT, self.format),
        ]
    }
}

/// A total score with the breakdown that justifies it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub total: f64,
    pub breakdown: ScoreBreakdown,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score `media` for `target` as of `today`.
pub fn score_media(
    media: &MediaAsset,
    target: &SlotTarget,
    theme: Option<&SeasonalTheme>,
    today: Date,
    config: &EngineConfig,
) -> Score {
    let w = &config.weights;

    let category = match target.category {
        Some(c) if c == media.category => w.category,
        _ => 0.0,
    };

    let season = if media.seasons.contains(&target.season) {
        w.season
    } else if media.seasons.contains(&Season::AllSeason) {
        w.season_all_season
    } else {
        0.0
    };

    let quality = round2(f64::from(media.quality) / f64::from(MAX_QUALITY) * w.quality);

    let freshness = freshness_points(media, today, config);

    let theme = theme.map_or(0.0, |t| theme_points(media, t, w.theme));

    let format = match (target.format, media.aspect_ratio.as_deref()) {
        (Some(f), Some(ratio)) if config.format_aspect_ratios.matches(f, ratio) => w.format,
        _ => 0.0,
    };

    let breakdown = ScoreBreakdown {
        category,
        season,
        quality,
        freshness,
        theme,
        format,
    };

    Score {
        total: breakdown.total(),
        breakdown,
    }
}

/// Freshness ramp. Never-used assets get the full weight; reused assets
/// climb linearly from the floor to the cap, which stays below the full
/// weight so unused media always wins on this dimension.
fn freshness_points(media: &MediaAsset, today: Date, config: &EngineConfig) -> f64 {
    let w = &config.weights;
    let last_used = match media.last_used_at {
        Some(ts) if media.used_count > 0 => ts.date_naive(),
        _ => return w.freshness,
    };

    let days_since = (today - last_used).num_days().max(0) as f64;
    let span = w.freshness_cap - w.freshness_floor;
    let ramp = w.freshness_floor + (days_since / w.freshness_ramp_days) * span;
    round2(ramp.min(w.freshness_cap))
}

/// Share of the theme's preferred tags found on the asset.
fn theme_points(media: &MediaAsset, theme: &SeasonalTheme, weight: f64) -> f64 {
    let theme_ambiances: HashSet<&str> = theme
        .preferred_ambiances
        .iter()
        .map(String::as_str)
        .collect();
    let theme_elements: HashSet<&str> = theme
        .preferred_elements
        .iter()
        .map(String::as_str)
        .collect();
    let media_ambiances: HashSet<&str> = media.ambiance.iter().map(String::as_str).collect();
    let media_elements: HashSet<&str> = media.elements.iter().map(String::as_str).collect();

    let overlap = media_ambiances.intersection(&theme_ambiances).count()
        + media_elements.intersection(&theme_elements).count();
    let possible = (theme_ambiances.len() + theme_elements.len()).max(1);

    let ratio = overlap as f64 / possible as f64;
    round2((ratio * weight).min(weight))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
