//! Candidate selection for a single slot.

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::media::MediaAsset;
use crate::scoring::{score_media, Score, SlotTarget};
use crate::themes::SeasonalTheme;
use crate::types::{Date, DbId};

/// Media ids that must not be offered for a slot.
#[derive(Debug, Clone, Copy)]
pub struct Exclusions<'a> {
    /// Assigned within the recency window before today.
    pub recent: &'a HashSet<DbId>,
    /// Already assigned earlier in the current generation run.
    pub batch: &'a HashSet<DbId>,
}

impl Exclusions<'_> {
    pub fn contains(&self, id: DbId) -> bool {
        self.recent.contains(&id) || self.batch.contains(&id)
    }
}

/// A ranked candidate for a slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    pub media: &'a MediaAsset,
    pub score: Score,
}

/// Rank `pool` for a slot and return the best `limit` candidates.
///
/// Assets that are excluded or below `min_quality` are dropped before
/// scoring. The sort is stable: candidates with equal totals keep their
/// order in `pool`, so callers that pass the pool in a fixed order get
/// reproducible picks.
#[allow(clippy::too_many_arguments)]
pub fn select_candidates<'a>(
    pool: &'a [MediaAsset],
    target: &SlotTarget,
    min_quality: i16,
    theme: Option<&SeasonalTheme>,
    exclusions: Exclusions<'_>,
    today: Date,
    limit: usize,
    config: &EngineConfig,
) -> Vec<Candidate<'a>> {
    let mut ranked: Vec<Candidate<'a>> = pool
        .iter()
        .filter(|m| m.quality >= min_quality && !exclusions.contains(m.id))
        .map(|media| Candidate {
            media,
            score: score_media(media, target, theme, today, config),
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total.total_cmp(&a.score.total));
    ranked.truncate(limit);
    ranked
}
