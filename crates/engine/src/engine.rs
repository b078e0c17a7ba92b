//! Calendar generation and slot lifecycle operations.

use std::collections::BTreeMap;

use chrono::Duration;
use serde::Serialize;

use editoria_core::calendar::{
    count_by_status, generate_calendar, CalendarEntry, GenerationRequest, GenerationSnapshot,
    NewCalendarEntry,
};
use editoria_core::config::EngineConfig;
use editoria_core::error::CoreError;
use editoria_core::lifecycle::{status_after_swap, EntryStatus};
use editoria_core::media::MediaAsset;
use editoria_core::ports::{CaptionGenerator, EditorialStore, Publisher};
use editoria_core::scoring::{score_media, Score};
use editoria_core::selection::{select_candidates, Exclusions};
use editoria_core::themes::{resolve_active_theme, validate_date_range, validate_theme};
use editoria_core::types::{Date, DbId, Timestamp};

use crate::error::EngineResult;

/// Source of the current time. Swapped out in tests.
pub type Clock = fn() -> Timestamp;

/// Outcome of a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub start: Date,
    pub end: Date,
    pub overwrite: bool,
    /// Entries with media assigned.
    pub generated: usize,
    /// Entries left without media.
    pub planned: usize,
    /// Rows written to the store.
    pub written: u64,
    pub entries: Vec<NewCalendarEntry>,
}

/// A ranked replacement candidate for an entry.
#[derive(Debug, Clone, Serialize)]
pub struct MediaSuggestion {
    pub media: MediaAsset,
    pub score: Score,
}

/// The editorial scheduling engine.
///
/// Wraps a store, a publishing bridge and a caption service behind the
/// collaborator traits. All methods take `&self`; the engine holds no
/// mutable state between calls.
pub struct EditorialEngine<S, P, C> {
    pub(crate) store: S,
    pub(crate) publisher: P,
    pub(crate) captions: C,
    pub(crate) config: EngineConfig,
    pub(crate) clock: Clock,
}

impl<S, P, C> EditorialEngine<S, P, C>
where
    S: EditorialStore,
    P: Publisher,
    C: CaptionGenerator,
{
    /// Build an engine. Fails when `config` does not validate.
    pub fn new(store: S, publisher: P, captions: C, config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            publisher,
            captions,
            config,
            clock: chrono::Utc::now,
        })
    }

    /// Replace the clock used for "today" and "now".
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn now(&self) -> Timestamp {
        (self.clock)()
    }

    pub(crate) fn today(&self) -> Date {
        self.now().date_naive()
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    /// Load everything a generation run reads, once.
    async fn load_snapshot(&self, request: &GenerationRequest) -> EngineResult<GenerationSnapshot> {
        let since = self.today() - Duration::days(self.config.recency_lookback_days);

        let media = self.store.fetch_eligible_media().await?;
        let rules = self.store.fetch_active_rules().await?;
        let recently_used = self.store.fetch_recently_used_ids(since).await?;
        let existing = if request.overwrite {
            Default::default()
        } else {
            self.store.fetch_existing_keys(request.start, request.end).await?
        };

        tracing::debug!(
            media = media.len(),
            rules = rules.len(),
            recently_used = recently_used.len(),
            existing = existing.len(),
            %since,
            "Loaded generation snapshot"
        );

        Ok(GenerationSnapshot {
            media,
            rules,
            recently_used,
            existing,
        })
    }

    /// Compute the entries a generation run would write, without writing.
    pub async fn plan(&self, request: &GenerationRequest) -> EngineResult<Vec<NewCalendarEntry>> {
        request.validate()?;
        let snapshot = self.load_snapshot(request).await?;

        let themes = self.store.fetch_active_themes().await?;
        for theme in &themes {
            validate_theme(theme)?;
        }

        let entries = generate_calendar(
            request,
            &snapshot,
            |date| resolve_active_theme(&themes, date),
            &self.config,
        )?;
        Ok(entries)
    }

    /// Fill `request`'s range and upsert the result in one write.
    pub async fn generate(&self, request: &GenerationRequest) -> EngineResult<GenerationReport> {
        let entries = self.plan(request).await?;

        let written = if entries.is_empty() {
            0
        } else {
            self.store.upsert_entries(&entries).await?
        };

        let generated = entries.iter().filter(|e| e.media_id.is_some()).count();
        let report = GenerationReport {
            start: request.start,
            end: request.end,
            overwrite: request.overwrite,
            generated,
            planned: entries.len() - generated,
            written,
            entries,
        };

        tracing::info!(
            start = %report.start,
            end = %report.end,
            overwrite = report.overwrite,
            generated = report.generated,
            planned = report.planned,
            written = report.written,
            "Calendar generated"
        );
        Ok(report)
    }

    /// Delete every entry in `[start, end]`.
    pub async fn delete_range(&self, start: Date, end: Date) -> EngineResult<u64> {
        validate_date_range(start, end)?;
        let deleted = self.store.delete_range(start, end).await?;
        tracing::info!(%start, %end, deleted, "Calendar range deleted");
        Ok(deleted)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn get_entry(&self, id: DbId) -> EngineResult<CalendarEntry> {
        self.store
            .fetch_entry(id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "CalendarEntry",
                    id,
                }
                .into()
            })
    }

    pub async fn list(
        &self,
        start: Date,
        end: Date,
        status: Option<EntryStatus>,
    ) -> EngineResult<Vec<CalendarEntry>> {
        validate_date_range(start, end)?;
        Ok(self.store.list_entries(start, end, status).await?)
    }

    /// Entry count per status over `[start, end]`.
    pub async fn status_counts(
        &self,
        start: Date,
        end: Date,
    ) -> EngineResult<BTreeMap<EntryStatus, usize>> {
        let entries = self.list(start, end, None).await?;
        Ok(count_by_status(&entries))
    }

    /// Best replacement media for an entry, recent assignments excluded.
    pub async fn suggest_media(
        &self,
        id: DbId,
        limit: Option<usize>,
    ) -> EngineResult<Vec<MediaSuggestion>> {
        let entry = self.get_entry(id).await?;
        let since = self.today() - Duration::days(self.config.recency_lookback_days);

        let pool = self.store.fetch_eligible_media().await?;
        let recent = self.store.fetch_recently_used_ids(since).await?;
        let theme = self.store.resolve_active_theme(entry.post_date).await?;
        let no_batch = Default::default();

        let suggestions = select_candidates(
            &pool,
            &entry.slot_target(),
            self.config.default_min_quality,
            theme.as_ref(),
            Exclusions {
                recent: &recent,
                batch: &no_batch,
            },
            entry.post_date,
            limit.unwrap_or(self.config.candidate_count),
            &self.config,
        )
        .into_iter()
        .map(|c| MediaSuggestion {
            media: c.media.clone(),
            score: c.score,
        })
        .collect();
        Ok(suggestions)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Move an entry to `to` if the state machine allows it.
    ///
    /// Moving to `published` stamps `published_at` and bumps media usage.
    /// Moving back to `generated` drops the entry's caption.
    pub(crate) async fn transition(
        &self,
        id: DbId,
        to: EntryStatus,
    ) -> EngineResult<CalendarEntry> {
        let mut entry = self.get_entry(id).await?;
        entry.status.validate_transition(to)?;
        let from = entry.status;

        match to {
            EntryStatus::Published => {
                let now = self.now();
                self.store.mark_published(id, now).await?;
                entry.published_at = Some(now);
                entry.publish_error = None;
                self.record_usage(&entry).await;
            }
            EntryStatus::Generated => {
                self.store.discard_content(id, to).await?;
                entry.content_id = None;
            }
            _ => self.store.update_status(id, to).await?,
        }
        tracing::info!(entry_id = id, from = %from, to = %to, "Entry status changed");

        entry.status = to;
        Ok(entry)
    }

    /// Approve an entry for publishing. No caption is required.
    pub async fn validate(&self, id: DbId) -> EngineResult<CalendarEntry> {
        self.transition(id, EntryStatus::Validated).await
    }

    pub async fn skip(&self, id: DbId) -> EngineResult<CalendarEntry> {
        self.transition(id, EntryStatus::Skipped).await
    }

    /// Roll back to `generated`, discarding the caption so it can be
    /// regenerated. The content row itself is kept.
    pub async fn reset(&self, id: DbId) -> EngineResult<CalendarEntry> {
        self.transition(id, EntryStatus::Generated).await
    }

    /// Mark an entry live once the platform confirms it, for scheduled
    /// posts or posts published outside the bridge.
    pub async fn mark_published(&self, id: DbId) -> EngineResult<CalendarEntry> {
        self.transition(id, EntryStatus::Published).await
    }

    /// Replace an entry's media with a manual pick, storing a fresh score.
    ///
    /// A validated entry loses its approval: it returns to `content_ready`
    /// if it has a caption and to `generated` otherwise.
    pub async fn swap_media(&self, id: DbId, media_id: DbId) -> EngineResult<CalendarEntry> {
        let entry = self.get_entry(id).await?;
        let status = status_after_swap(entry.status, entry.content_id.is_some())?;

        let media = self.store.fetch_media(media_id).await?.ok_or(CoreError::NotFound {
            entity: "MediaAsset",
            id: media_id,
        })?;
        let theme = self.store.resolve_active_theme(entry.post_date).await?;
        let score = score_media(
            &media,
            &entry.slot_target(),
            theme.as_ref(),
            entry.post_date,
            &self.config,
        );

        self.store.update_media(id, media_id, score, status).await?;
        tracing::info!(
            entry_id = id,
            media_id,
            score = score.total,
            from = %entry.status,
            to = %status,
            "Entry media swapped"
        );
        self.get_entry(id).await
    }

    /// Bump usage stats of the entry's media. Failures are logged only.
    pub(crate) async fn record_usage(&self, entry: &CalendarEntry) {
        let Some(media_id) = entry.effective_media_id() else {
            return;
        };
        if let Err(e) = self.store.record_usage(media_id, self.now()).await {
            tracing::warn!(
                entry_id = entry.id,
                media_id,
                error = %e,
                "Failed to record media usage"
            );
        }
    }
}
