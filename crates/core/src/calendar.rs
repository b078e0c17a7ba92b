//! Calendar entries and the calendar generator.
//!
//! The generator walks a date range day by day, applies the weekly posting
//! rules, and assigns each slot the best-scoring media asset not used
//! recently and not already assigned earlier in the same run. It is a pure
//! function over a [`GenerationSnapshot`] loaded once up front, so two runs
//! over identical inputs produce identical entries.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Duration};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::CoreError;
use crate::lifecycle::EntryStatus;
use crate::media::{Category, MediaAsset};
use crate::rules::{rules_by_weekday, PostFormat, PostingRule};
use crate::scoring::{ScoreBreakdown, SlotTarget};
use crate::season::{season_for_date, Season};
use crate::selection::{select_candidates, Exclusions};
use crate::themes::{validate_date_range, SeasonalTheme};
use crate::types::{Date, DbId, SlotKey, Timestamp};

/// Longest range a single generation run may cover, in days.
pub const MAX_GENERATION_DAYS: i64 = 366;

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// A calendar entry as produced by the generator, ready to upsert on
/// `(post_date, slot_index)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCalendarEntry {
    pub post_date: Date,
    pub slot_index: i32,
    pub time_slot: Option<String>,
    pub rule_id: Option<DbId>,
    pub target_category: Option<Category>,
    pub target_format: Option<PostFormat>,
    pub season_context: Season,
    /// Snapshot of the governing theme at generation time.
    pub theme_id: Option<DbId>,
    pub theme_name: Option<String>,
    pub media_id: Option<DbId>,
    pub media_score: Option<f64>,
    pub score_breakdown: Option<ScoreBreakdown>,
    pub status: EntryStatus,
}

impl NewCalendarEntry {
    pub fn key(&self) -> SlotKey {
        (self.post_date, self.slot_index)
    }
}

/// A stored calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: DbId,
    pub post_date: Date,
    pub slot_index: i32,
    pub time_slot: Option<String>,
    pub rule_id: Option<DbId>,
    pub target_category: Option<Category>,
    pub target_format: Option<PostFormat>,
    pub season_context: Option<Season>,
    pub theme_id: Option<DbId>,
    pub theme_name: Option<String>,
    pub media_id: Option<DbId>,
    /// Editor override; wins over `media_id` wherever media is resolved.
    pub manual_media_id: Option<DbId>,
    pub media_score: Option<f64>,
    pub score_breakdown: Option<ScoreBreakdown>,
    pub status: EntryStatus,
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

impl CalendarEntry {
    /// The media that will actually be posted.
    pub fn effective_media_id(&self) -> Option<DbId> {
        self.manual_media_id.or(self.media_id)
    }

    pub fn key(&self) -> SlotKey {
        (self.post_date, self.slot_index)
    }

    /// Season stored on the entry, or the month's season for older rows.
    pub fn season(&self) -> Season {
        self.season_context
            .unwrap_or_else(|| season_for_date(self.post_date))
    }

    /// Scoring target rebuilt from the entry's snapshot.
    pub fn slot_target(&self) -> SlotTarget {
        SlotTarget {
            category: self.target_category,
            season: self.season(),
            format: self.target_format,
        }
    }
}

/// Number of entries per status, every status present (zero when absent).
pub fn count_by_status(entries: &[CalendarEntry]) -> BTreeMap<EntryStatus, usize> {
    let mut counts: BTreeMap<EntryStatus, usize> =
        EntryStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for entry in entries {
        *counts.entry(entry.status).or_default() += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Range and mode of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub start: Date,
    /// Inclusive.
    pub end: Date,
    /// Replace existing `(date, slot)` entries instead of skipping them.
    #[serde(default)]
    pub overwrite: bool,
}

impl GenerationRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_date_range(self.start, self.end)?;
        let days = (self.end - self.start).num_days() + 1;
        if days > MAX_GENERATION_DAYS {
            return Err(CoreError::Validation(format!(
                "Generation range covers {days} days, maximum is {MAX_GENERATION_DAYS}"
            )));
        }
        Ok(())
    }

    /// Every date of the range, ascending.
    pub fn dates(&self) -> impl Iterator<Item = Date> {
        let end = self.end;
        std::iter::successors(Some(self.start), |d| d.checked_add_signed(Duration::days(1)))
            .take_while(move |d| *d <= end)
    }
}

/// Inputs read once before a generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerationSnapshot {
    /// Eligible media, in the order the store returned it.
    pub media: Vec<MediaAsset>,
    pub rules: Vec<PostingRule>,
    pub recently_used: HashSet<DbId>,
    /// Keys already present in the range. Ignored when overwriting.
    pub existing: HashSet<SlotKey>,
}

/// Produce the entries to upsert for `request`.
///
/// Entries come out in ascending date, then slot order. Each media id is
/// assigned at most once per run; a slot with no qualifying media becomes a
/// `planned` entry with no media. Freshness is scored relative to each
/// slot's own post date.
pub fn generate_calendar<'t, F>(
    request: &GenerationRequest,
    snapshot: &GenerationSnapshot,
    mut resolve_theme: F,
    config: &EngineConfig,
) -> Result<Vec<NewCalendarEntry>, CoreError>
where
    F: FnMut(Date) -> Option<&'t SeasonalTheme>,
{
    request.validate()?;
    let by_weekday = rules_by_weekday(&snapshot.rules)?;

    let mut entries = Vec::new();
    let mut batch_used: HashSet<DbId> = HashSet::new();

    for date in request.dates() {
        let weekday = date.weekday().number_from_monday() as i16;
        let Some(day_rules) = by_weekday.get(&weekday) else {
            continue;
        };
        let season = season_for_date(date);
        let theme = resolve_theme(date);

        for rule in day_rules {
            if !request.overwrite && snapshot.existing.contains(&(date, rule.slot_index)) {
                continue;
            }

            let target = SlotTarget {
                category: rule.default_category,
                season,
                format: rule.preferred_format,
            };
            let min_quality = rule.quality_floor(config);

            let best = select_candidates(
                &snapshot.media,
                &target,
                min_quality,
                theme,
                Exclusions {
                    recent: &snapshot.recently_used,
                    batch: &batch_used,
                },
                date,
                1,
                config,
            )
            .into_iter()
            .next();

            if let Some(c) = &best {
                batch_used.insert(c.media.id);
            }

            entries.push(NewCalendarEntry {
                post_date: date,
                slot_index: rule.slot_index,
                time_slot: rule.preferred_time.clone(),
                rule_id: Some(rule.id),
                target_category: rule.default_category,
                target_format: rule.preferred_format,
                season_context: season,
                theme_id: theme.map(|t| t.id),
                theme_name: theme.map(|t| t.theme_name.clone()),
                media_id: best.as_ref().map(|c| c.media.id),
                media_score: best.as_ref().map(|c| c.score.total),
                score_breakdown: best.as_ref().map(|c| c.score.breakdown),
                status: if best.is_some() {
                    EntryStatus::Generated
                } else {
                    EntryStatus::Planned
                },
            });
        }
    }

    Ok(entries)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
