//! In-memory collaborators for engine integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use editoria_core::calendar::{CalendarEntry, NewCalendarEntry};
use editoria_core::config::EngineConfig;
use editoria_core::content::{
    CaptionSet, CaptionUsage, GeneratedCaptions, GeneratedContent, LocalizedText, NewContent,
    SlotContext, CONTENT_STATUS_DISCARDED, CONTENT_STATUS_DRAFT,
};
use editoria_core::lifecycle::EntryStatus;
use editoria_core::media::{Category, MediaAsset, MediaKind};
use editoria_core::ports::{
    CalendarStore, CaptionGenerator, CollaboratorError, ContentLink, ContentStore, MediaLibrary,
    PostingRuleSource, StoreError, StoreResult, ThemeSource,
};
use editoria_core::publishing::{PublishReceipt, PublishRecord, PublishRequest};
use editoria_core::rules::PostingRule;
use editoria_core::scoring::Score;
use editoria_core::season::Season;
use editoria_core::themes::SeasonalTheme;
use editoria_core::types::{Date, DbId, SlotKey, Timestamp};
use editoria_engine::EditorialEngine;

pub type TestEngine = EditorialEngine<MemoryStore, FakePublisher, FakeCaptions>;

// ---------------------------------------------------------------------------
// Clock and fixtures
// ---------------------------------------------------------------------------

/// Sunday 2026-03-01 09:00 UTC.
pub fn fixed_now() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd_opt(y, m, d).unwrap()
}

/// Monday 2026-03-02, the day after [`fixed_now`].
pub fn monday() -> Date {
    date(2026, 3, 2)
}

pub fn test_config() -> EngineConfig {
    EngineConfig {
        batch_delay_ms: 0,
        ..EngineConfig::default()
    }
}

pub fn rule(id: DbId, day: i16, slot: i32, category: Option<Category>) -> PostingRule {
    PostingRule {
        id,
        day_of_week: day,
        slot_index: slot,
        default_category: category,
        preferred_format: None,
        preferred_aspect_ratio: None,
        min_quality: Some(6),
        preferred_time: Some("10:00".into()),
        is_active: true,
        notes: None,
    }
}

pub fn room(id: DbId, quality: i16) -> MediaAsset {
    MediaAsset::new(id, Category::Room, MediaKind::Image, quality)
        .with_seasons(&[Season::AllSeason])
}

pub fn captions() -> GeneratedCaptions {
    GeneratedCaptions {
        captions: CaptionSet {
            short: LocalizedText {
                es: "Hola".into(),
                en: "Hello".into(),
                fr: "Bonjour".into(),
            },
            ..Default::default()
        },
        hashtags: vec!["hotel".into()],
        usage: CaptionUsage::default(),
    }
}

pub fn new_content(entry_id: DbId) -> NewContent {
    let generated = captions();
    NewContent {
        calendar_id: entry_id,
        media_id: None,
        captions: generated.captions,
        hashtags: generated.hashtags,
        usage: generated.usage,
        generation_params: serde_json::Value::Null,
    }
}

/// Engine over fresh fakes, with handles to each fake.
pub fn engine_with(
    store: MemoryStore,
) -> (TestEngine, MemoryStore, FakePublisher, FakeCaptions) {
    let publisher = FakePublisher::default();
    let captions = FakeCaptions::default();
    let engine = EditorialEngine::new(
        store.clone(),
        publisher.clone(),
        captions.clone(),
        test_config(),
    )
    .unwrap()
    .with_clock(fixed_now);
    (engine, store, publisher, captions)
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct StoreState {
    pub media: Vec<MediaAsset>,
    pub rules: Vec<PostingRule>,
    pub themes: Vec<SeasonalTheme>,
    pub entries: Vec<CalendarEntry>,
    pub contents: Vec<GeneratedContent>,
    pub usage: Vec<(DbId, Timestamp)>,
    pub next_id: DbId,
    /// Simulates a store without the content link column.
    pub degraded_links: bool,
    /// Makes the next `upsert_entries` fail.
    pub fail_next_upsert: bool,
    pub upsert_calls: usize,
}

/// Store fake sharing its state between clones.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    pub fn new(media: Vec<MediaAsset>, rules: Vec<PostingRule>) -> Self {
        let store = Self::default();
        {
            let mut s = store.state.lock().unwrap();
            s.media = media;
            s.rules = rules;
        }
        store
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn entry(&self, id: DbId) -> CalendarEntry {
        self.with(|s| s.entries.iter().find(|e| e.id == id).cloned().unwrap())
    }

    pub fn entries(&self) -> Vec<CalendarEntry> {
        self.with(|s| s.entries.clone())
    }

    /// Insert a stored entry directly, bypassing generation.
    pub fn seed_entry(
        &self,
        post_date: Date,
        slot: i32,
        media_id: Option<DbId>,
        status: EntryStatus,
    ) -> DbId {
        self.with(|s| {
            s.next_id += 1;
            let id = s.next_id;
            s.entries.push(CalendarEntry {
                id,
                post_date,
                slot_index: slot,
                time_slot: Some("10:00".into()),
                rule_id: None,
                target_category: Some(Category::Room),
                target_format: None,
                season_context: None,
                theme_id: None,
                theme_name: None,
                media_id,
                manual_media_id: None,
                media_score: None,
                score_breakdown: None,
                status,
                content_id: None,
                post_id: None,
                permalink: None,
                container_id: None,
                scheduled_at: None,
                published_at: None,
                publish_error: None,
                created_at: fixed_now(),
                updated_at: fixed_now(),
            });
            id
        })
    }

    fn update_entry(&self, id: DbId, f: impl FnOnce(&mut CalendarEntry)) -> StoreResult<()> {
        self.with(|s| match s.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                f(entry);
                entry.updated_at = fixed_now();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "CalendarEntry",
                id,
            }),
        })
    }
}

fn stored_entry(id: DbId, e: &NewCalendarEntry) -> CalendarEntry {
    CalendarEntry {
        id,
        post_date: e.post_date,
        slot_index: e.slot_index,
        time_slot: e.time_slot.clone(),
        rule_id: e.rule_id,
        target_category: e.target_category,
        target_format: e.target_format,
        season_context: Some(e.season_context),
        theme_id: e.theme_id,
        theme_name: e.theme_name.clone(),
        media_id: e.media_id,
        manual_media_id: None,
        media_score: e.media_score,
        score_breakdown: e.score_breakdown,
        status: e.status,
        content_id: None,
        post_id: None,
        permalink: None,
        container_id: None,
        scheduled_at: None,
        published_at: None,
        publish_error: None,
        created_at: fixed_now(),
        updated_at: fixed_now(),
    }
}

impl MediaLibrary for MemoryStore {
    async fn fetch_eligible_media(&self) -> StoreResult<Vec<MediaAsset>> {
        Ok(self.with(|s| s.media.clone()))
    }

    async fn fetch_media(&self, id: DbId) -> StoreResult<Option<MediaAsset>> {
        Ok(self.with(|s| s.media.iter().find(|m| m.id == id).cloned()))
    }

    async fn fetch_media_by_ids(&self, ids: &[DbId]) -> StoreResult<HashMap<DbId, MediaAsset>> {
        Ok(self.with(|s| {
            s.media
                .iter()
                .filter(|m| ids.contains(&m.id))
                .map(|m| (m.id, m.clone()))
                .collect()
        }))
    }

    async fn record_usage(&self, id: DbId, at: Timestamp) -> StoreResult<()> {
        self.with(|s| {
            s.usage.push((id, at));
            if let Some(m) = s.media.iter_mut().find(|m| m.id == id) {
                m.used_count += 1;
                m.last_used_at = Some(at);
            }
        });
        Ok(())
    }
}

impl PostingRuleSource for MemoryStore {
    async fn fetch_active_rules(&self) -> StoreResult<Vec<PostingRule>> {
        Ok(self.with(|s| s.rules.iter().filter(|r| r.is_active).cloned().collect()))
    }
}

impl ThemeSource for MemoryStore {
    async fn fetch_active_themes(&self) -> StoreResult<Vec<SeasonalTheme>> {
        Ok(self.with(|s| s.themes.iter().filter(|t| t.is_active).cloned().collect()))
    }
}

impl CalendarStore for MemoryStore {
    async fn fetch_recently_used_ids(&self, since: Date) -> StoreResult<HashSet<DbId>> {
        Ok(self.with(|s| {
            s.entries
                .iter()
                .filter(|e| e.post_date >= since)
                .filter_map(CalendarEntry::effective_media_id)
                .collect()
        }))
    }

    async fn fetch_existing_keys(&self, start: Date, end: Date) -> StoreResult<HashSet<SlotKey>> {
        Ok(self.with(|s| {
            s.entries
                .iter()
                .filter(|e| e.post_date >= start && e.post_date <= end)
                .map(CalendarEntry::key)
                .collect()
        }))
    }

    async fn upsert_entries(&self, entries: &[NewCalendarEntry]) -> StoreResult<u64> {
        self.with(|s| {
            s.upsert_calls += 1;
            if s.fail_next_upsert {
                s.fail_next_upsert = false;
                return Err(StoreError::Unavailable("connection reset".into()));
            }
            for new in entries {
                match s.entries.iter().position(|e| e.key() == new.key()) {
                    Some(pos) => {
                        let id = s.entries[pos].id;
                        s.entries[pos] = stored_entry(id, new);
                    }
                    None => {
                        s.next_id += 1;
                        let id = s.next_id;
                        s.entries.push(stored_entry(id, new));
                    }
                }
            }
            Ok(entries.len() as u64)
        })
    }

    async fn fetch_entry(&self, id: DbId) -> StoreResult<Option<CalendarEntry>> {
        Ok(self.with(|s| s.entries.iter().find(|e| e.id == id).cloned()))
    }

    async fn list_entries(
        &self,
        start: Date,
        end: Date,
        status: Option<EntryStatus>,
    ) -> StoreResult<Vec<CalendarEntry>> {
        Ok(self.with(|s| {
            let mut found: Vec<CalendarEntry> = s
                .entries
                .iter()
                .filter(|e| e.post_date >= start && e.post_date <= end)
                .filter(|e| status.is_none_or(|st| e.status == st))
                .cloned()
                .collect();
            found.sort_by_key(CalendarEntry::key);
            found
        }))
    }

    async fn update_status(&self, id: DbId, status: EntryStatus) -> StoreResult<()> {
        self.update_entry(id, |e| e.status = status)
    }

    async fn mark_published(&self, id: DbId, at: Timestamp) -> StoreResult<()> {
        self.update_entry(id, |e| {
            e.status = EntryStatus::Published;
            e.published_at = Some(at);
            e.publish_error = None;
        })
    }

    async fn discard_content(&self, id: DbId, status: EntryStatus) -> StoreResult<()> {
        self.with(|s| {
            for content in s.contents.iter_mut().filter(|c| c.calendar_id == id) {
                content.content_status = CONTENT_STATUS_DISCARDED.into();
            }
        });
        self.update_entry(id, |e| {
            e.content_id = None;
            e.status = status;
        })
    }

    async fn update_media(
        &self,
        id: DbId,
        media_id: DbId,
        score: Score,
        status: EntryStatus,
    ) -> StoreResult<()> {
        self.update_entry(id, |e| {
            e.manual_media_id = Some(media_id);
            e.media_score = Some(score.total);
            e.score_breakdown = Some(score.breakdown);
            e.status = status;
        })
    }

    async fn record_publish(
        &self,
        id: DbId,
        status: EntryStatus,
        record: &PublishRecord,
    ) -> StoreResult<()> {
        self.update_entry(id, |e| {
            e.status = status;
            e.post_id = record.receipt.post_id.clone();
            e.permalink = record.receipt.permalink.clone();
            e.container_id = record.receipt.container_id.clone();
            e.scheduled_at = record.scheduled_at;
            e.published_at = record.published_at;
            e.publish_error = None;
        })
    }

    async fn record_publish_error(&self, id: DbId, error: &str) -> StoreResult<()> {
        self.update_entry(id, |e| e.publish_error = Some(error.to_string()))
    }

    async fn clear_publish_error(&self, id: DbId) -> StoreResult<()> {
        self.update_entry(id, |e| e.publish_error = None)
    }

    async fn delete_range(&self, start: Date, end: Date) -> StoreResult<u64> {
        Ok(self.with(|s| {
            let before = s.entries.len();
            s.entries.retain(|e| e.post_date < start || e.post_date > end);
            (before - s.entries.len()) as u64
        }))
    }
}

impl ContentStore for MemoryStore {
    async fn insert_content(&self, content: &NewContent) -> StoreResult<GeneratedContent> {
        Ok(self.with(|s| {
            s.next_id += 1;
            let stored = GeneratedContent {
                id: s.next_id,
                calendar_id: content.calendar_id,
                media_id: content.media_id,
                captions: content.captions.clone(),
                hashtags: content.hashtags.clone(),
                usage: content.usage.clone(),
                generation_params: content.generation_params.clone(),
                content_status: CONTENT_STATUS_DRAFT.into(),
                created_at: fixed_now(),
            };
            s.contents.push(stored.clone());
            stored
        }))
    }

    async fn fetch_content(&self, id: DbId) -> StoreResult<Option<GeneratedContent>> {
        Ok(self.with(|s| s.contents.iter().find(|c| c.id == id).cloned()))
    }

    async fn fetch_content_for_entries(
        &self,
        entry_ids: &[DbId],
    ) -> StoreResult<HashMap<DbId, GeneratedContent>> {
        Ok(self.with(|s| {
            s.contents
                .iter()
                .filter(|c| entry_ids.contains(&c.calendar_id))
                .filter(|c| c.content_status != CONTENT_STATUS_DISCARDED)
                .map(|c| (c.calendar_id, c.clone()))
                .collect()
        }))
    }

    async fn link_content(&self, entry_id: DbId, content_id: DbId) -> StoreResult<ContentLink> {
        if self.with(|s| s.degraded_links) {
            return Ok(ContentLink::Degraded);
        }
        self.update_entry(entry_id, |e| e.content_id = Some(content_id))?;
        Ok(ContentLink::Linked)
    }
}

// ---------------------------------------------------------------------------
// External service fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct PublisherState {
    pub requests: Vec<PublishRequest>,
    /// Error returned by every call while set.
    pub failure: Option<String>,
}

#[derive(Clone, Default)]
pub struct FakePublisher {
    pub state: Arc<Mutex<PublisherState>>,
}

impl FakePublisher {
    pub fn fail_with(&self, error: &str) {
        self.state.lock().unwrap().failure = Some(error.to_string());
    }

    pub fn succeed(&self) {
        self.state.lock().unwrap().failure = None;
    }

    pub fn requests(&self) -> Vec<PublishRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

impl editoria_core::ports::Publisher for FakePublisher {
    async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt, CollaboratorError> {
        let mut s = self.state.lock().unwrap();
        s.requests.push(request.clone());
        if let Some(error) = &s.failure {
            return Err(CollaboratorError::Rejected(error.clone()));
        }
        Ok(PublishReceipt {
            post_id: Some(format!("post-{}", request.entry_id)),
            permalink: Some(format!("https://example.test/p/{}", request.entry_id)),
            container_id: Some(format!("container-{}", request.entry_id)),
        })
    }
}

#[derive(Default)]
pub struct CaptionState {
    pub contexts: Vec<SlotContext>,
    pub fail: bool,
}

#[derive(Clone, Default)]
pub struct FakeCaptions {
    pub state: Arc<Mutex<CaptionState>>,
}

impl FakeCaptions {
    pub fn fail(&self) {
        self.state.lock().unwrap().fail = true;
    }

    pub fn contexts(&self) -> Vec<SlotContext> {
        self.state.lock().unwrap().contexts.clone()
    }
}

impl CaptionGenerator for FakeCaptions {
    async fn generate(
        &self,
        context: &SlotContext,
    ) -> Result<GeneratedCaptions, CollaboratorError> {
        let mut s = self.state.lock().unwrap();
        s.contexts.push(context.clone());
        if s.fail {
            return Err(CollaboratorError::Unavailable("caption service down".into()));
        }
        Ok(captions())
    }
}
