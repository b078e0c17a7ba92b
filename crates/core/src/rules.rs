//! Weekly posting rules.
//!
//! A rule defines one recurring slot, keyed by `(day_of_week, slot_index)`,
//! with the targets the generator uses to pick media for it.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::CoreError;
use crate::media::{Category, MAX_QUALITY, MIN_QUALITY};
use crate::types::DbId;

/// Quality floor applied when a rule does not set one.
pub const DEFAULT_MIN_QUALITY: i16 = 6;

/// Posting time used when a rule does not set one.
pub const DEFAULT_TIME_SLOT: &str = "10:00";

/// Format used for `HH:MM` time slots.
pub const TIME_SLOT_FORMAT: &str = "%H:%M";

define_str_enum! {
    /// Publication format on the social platform.
    PostFormat("format") {
        Feed = "feed",
        Story = "story",
        Reel = "reel",
    }
}

/// A recurring weekly posting slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingRule {
    pub id: DbId,
    /// ISO weekday, 1 = Monday .. 7 = Sunday.
    pub day_of_week: i16,
    /// 1-based position of the slot within the day.
    pub slot_index: i32,
    pub default_category: Option<Category>,
    pub preferred_format: Option<PostFormat>,
    pub preferred_aspect_ratio: Option<String>,
    pub min_quality: Option<i16>,
    /// `HH:MM`, venue local time.
    pub preferred_time: Option<String>,
    pub is_active: bool,
    pub notes: Option<String>,
}

impl PostingRule {
    /// Quality floor for the slot, falling back to the configured default.
    pub fn quality_floor(&self, config: &EngineConfig) -> i16 {
        self.min_quality.unwrap_or(config.default_min_quality)
    }
}

/// Validate an ISO weekday number.
pub fn validate_day_of_week(day: i16) -> Result<(), CoreError> {
    if (1..=7).contains(&day) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "day_of_week must be between 1 (Monday) and 7 (Sunday), got {day}"
        )))
    }
}

/// Validate a 1-based slot index.
pub fn validate_slot_index(slot: i32) -> Result<(), CoreError> {
    if slot >= 1 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "slot_index must be >= 1, got {slot}"
        )))
    }
}

/// Validate a minimum quality value.
pub fn validate_min_quality(quality: i16) -> Result<(), CoreError> {
    if (MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "min_quality must be between {MIN_QUALITY} and {MAX_QUALITY}, got {quality}"
        )))
    }
}

/// Parse an `HH:MM` time slot.
pub fn parse_time_slot(value: &str) -> Result<NaiveTime, CoreError> {
    NaiveTime::parse_from_str(value.trim(), TIME_SLOT_FORMAT).map_err(|_| {
        CoreError::Validation(format!("Time slot must be HH:MM, got '{value}'"))
    })
}

/// Validate every field of a rule.
pub fn validate_rule(rule: &PostingRule) -> Result<(), CoreError> {
    validate_day_of_week(rule.day_of_week)?;
    validate_slot_index(rule.slot_index)?;
    if let Some(q) = rule.min_quality {
        validate_min_quality(q)?;
    }
    if let Some(t) = &rule.preferred_time {
        parse_time_slot(t)?;
    }
    Ok(())
}

/// Group active rules by weekday, each day's rules sorted by slot index.
///
/// Fails on the first invalid rule or on two active rules sharing the same
/// `(day_of_week, slot_index)` key.
pub fn rules_by_weekday(
    rules: &[PostingRule],
) -> Result<BTreeMap<i16, Vec<&PostingRule>>, CoreError> {
    let mut by_day: BTreeMap<i16, Vec<&PostingRule>> = BTreeMap::new();

    for rule in rules.iter().filter(|r| r.is_active) {
        validate_rule(rule).map_err(|e| match e {
            CoreError::Validation(msg) => {
                CoreError::Validation(format!("Posting rule {}: {msg}", rule.id))
            }
            other => other,
        })?;
        by_day.entry(rule.day_of_week).or_default().push(rule);
    }

    for (day, day_rules) in by_day.iter_mut() {
        day_rules.sort_by_key(|r| (r.slot_index, r.id));
        if let Some(pair) = day_rules
            .windows(2)
            .find(|w| w[0].slot_index == w[1].slot_index)
        {
            return Err(CoreError::Conflict(format!(
                "Posting rules {} and {} both define day {day} slot {}",
                pair[0].id, pair[1].id, pair[0].slot_index
            )));
        }
    }

    Ok(by_day)
}
