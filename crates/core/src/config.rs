//! Engine configuration: scoring weights, recency window, format ratios.
//!
//! Passed explicitly into scoring and generation so alternate weightings
//! can be exercised without global state. Every field has a default; a
//! partial JSON/TOML document only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::rules::{PostFormat, DEFAULT_MIN_QUALITY};

/// Upper bound of a total score.
pub const MAX_TOTAL_SCORE: f64 = 100.0;

/// Points per scoring dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub category: f64,
    /// Exact season match.
    pub season: f64,
    /// Asset tagged `all_season` for any target season.
    pub season_all_season: f64,
    pub quality: f64,
    /// Never-used assets.
    pub freshness: f64,
    /// Freshness of an asset used on the scoring day.
    pub freshness_floor: f64,
    /// Freshness ceiling for previously used assets.
    pub freshness_cap: f64,
    /// Days for the freshness ramp to go from floor to cap.
    pub freshness_ramp_days: f64,
    pub theme: f64,
    pub format: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            category: 25.0,
            season: 20.0,
            season_all_season: 12.0,
            quality: 20.0,
            freshness: 20.0,
            freshness_floor: 4.0,
            freshness_cap: 18.0,
            freshness_ramp_days: 30.0,
            theme: 10.0,
            format: 5.0,
        }
    }
}

impl ScoreWeights {
    /// Highest total the weights can produce.
    pub fn max_total(&self) -> f64 {
        self.category + self.season + self.quality + self.freshness + self.theme + self.format
    }
}

/// Aspect ratio labels conventionally associated with each post format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatAspectRatios {
    pub feed: Vec<String>,
    pub story: Vec<String>,
    pub reel: Vec<String>,
}

impl Default for FormatAspectRatios {
    fn default() -> Self {
        Self {
            feed: vec!["4:5".into(), "1:1".into()],
            story: vec!["9:16".into()],
            reel: vec!["9:16".into()],
        }
    }
}

impl FormatAspectRatios {
    pub fn ratios_for(&self, format: PostFormat) -> &[String] {
        match format {
            PostFormat::Feed => &self.feed,
            PostFormat::Story => &self.story,
            PostFormat::Reel => &self.reel,
        }
    }

    /// True when `ratio` is one of the labels associated with `format`.
    pub fn matches(&self, format: PostFormat, ratio: &str) -> bool {
        self.ratios_for(format).iter().any(|r| r == ratio)
    }
}

/// Tunables for the scheduling engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: ScoreWeights,
    pub format_aspect_ratios: FormatAspectRatios,
    /// Assets used on or after `today - recency_lookback_days` are excluded.
    pub recency_lookback_days: i64,
    /// Quality floor for rules that do not set one.
    pub default_min_quality: i16,
    /// How many ranked candidates a preview lists per slot.
    pub candidate_count: usize,
    /// A future publish time is pushed to at least `now + this`.
    pub publish_min_lead_secs: i64,
    /// Pause between items of a batch that calls an external service.
    pub batch_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            format_aspect_ratios: FormatAspectRatios::default(),
            recency_lookback_days: 7,
            default_min_quality: DEFAULT_MIN_QUALITY,
            candidate_count: 5,
            publish_min_lead_secs: 600,
            batch_delay_ms: 2000,
        }
    }
}

impl EngineConfig {
    /// Reject configurations that could push a score outside `[0, 100]`
    /// or break the freshness ordering (never-used above any reuse).
    pub fn validate(&self) -> Result<(), CoreError> {
        let w = &self.weights;
        let all = [
            ("category", w.category),
            ("season", w.season),
            ("season_all_season", w.season_all_season),
            ("quality", w.quality),
            ("freshness", w.freshness),
            ("freshness_floor", w.freshness_floor),
            ("freshness_cap", w.freshness_cap),
            ("theme", w.theme),
            ("format", w.format),
        ];
        if let Some((name, value)) = all.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(CoreError::Validation(format!(
                "Weight '{name}' must be a non-negative number, got {value}"
            )));
        }
        if w.max_total() > MAX_TOTAL_SCORE {
            return Err(CoreError::Validation(format!(
                "Scoring weights sum to {}, above the {MAX_TOTAL_SCORE} maximum",
                w.max_total()
            )));
        }
        if w.season_all_season > w.season {
            return Err(CoreError::Validation(
                "season_all_season must not exceed season".into(),
            ));
        }
        if !(w.freshness_floor <= w.freshness_cap && w.freshness_cap <= w.freshness) {
            return Err(CoreError::Validation(
                "Freshness weights must satisfy floor <= cap <= freshness".into(),
            ));
        }
        if !(w.freshness_ramp_days > 0.0) {
            return Err(CoreError::Validation(
                "freshness_ramp_days must be positive".into(),
            ));
        }
        if self.recency_lookback_days < 0 {
            return Err(CoreError::Validation(
                "recency_lookback_days must not be negative".into(),
            ));
        }
        crate::rules::validate_min_quality(self.default_min_quality)?;
        if self.candidate_count == 0 {
            return Err(CoreError::Validation(
                "candidate_count must be at least 1".into(),
            ));
        }
        if self.publish_min_lead_secs < 0 {
            return Err(CoreError::Validation(
                "publish_min_lead_secs must not be negative".into(),
            ));
        }
        Ok(())
    }
}
