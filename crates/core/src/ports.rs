//! Collaborator contracts.
//!
//! The engine depends only on these traits. `editoria-db` implements the
//! store traits on PostgreSQL; `editoria-api` implements [`Publisher`] and
//! [`CaptionGenerator`] over HTTP. Tests use in-memory fakes.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;

use crate::calendar::{CalendarEntry, NewCalendarEntry};
use crate::content::{GeneratedCaptions, GeneratedContent, NewContent, SlotContext};
use crate::lifecycle::EntryStatus;
use crate::media::MediaAsset;
use crate::publishing::{PublishReceipt, PublishRecord, PublishRequest};
use crate::rules::PostingRule;
use crate::scoring::Score;
use crate::themes::{resolve_active_theme, SeasonalTheme};
use crate::types::{Date, DbId, SlotKey, Timestamp};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure reported by a persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The row the operation targets does not exist.
    NotFound { entity: &'static str, id: DbId },
    /// A uniqueness or foreign key constraint rejected the write.
    Conflict(String),
    /// The store cannot be reached.
    Unavailable(String),
    /// Any other query failure.
    Query(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::Conflict(msg) => write!(f, "Store conflict: {msg}"),
            Self::Unavailable(msg) => write!(f, "Store unavailable: {msg}"),
            Self::Query(msg) => write!(f, "Store query failed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Failure reported by an external service (caption generation, publishing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The service could not be reached.
    Unavailable(String),
    /// The service answered with an error.
    Rejected(String),
    /// The service did not answer in time.
    Timeout { elapsed_ms: u64 },
    /// The service answered with something unreadable.
    InvalidResponse(String),
}

impl fmt::Display for CollaboratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "Service unavailable: {msg}"),
            Self::Rejected(msg) => write!(f, "Service rejected the request: {msg}"),
            Self::Timeout { elapsed_ms } => write!(f, "Service timed out after {elapsed_ms}ms"),
            Self::InvalidResponse(msg) => write!(f, "Invalid service response: {msg}"),
        }
    }
}

impl std::error::Error for CollaboratorError {}

pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Store traits
// ---------------------------------------------------------------------------

/// Read access to the tagged media library, plus usage bookkeeping.
pub trait MediaLibrary: Send + Sync {
    /// Media with ingestion status `analyzed`, in a stable order.
    fn fetch_eligible_media(&self) -> impl Future<Output = StoreResult<Vec<MediaAsset>>> + Send;

    fn fetch_media(
        &self,
        id: DbId,
    ) -> impl Future<Output = StoreResult<Option<MediaAsset>>> + Send;

    fn fetch_media_by_ids(
        &self,
        ids: &[DbId],
    ) -> impl Future<Output = StoreResult<HashMap<DbId, MediaAsset>>> + Send;

    /// Increment `used_count` and set `last_used_at`.
    fn record_usage(
        &self,
        id: DbId,
        at: Timestamp,
    ) -> impl Future<Output = StoreResult<()>> + Send;
}

pub trait PostingRuleSource: Send + Sync {
    fn fetch_active_rules(&self) -> impl Future<Output = StoreResult<Vec<PostingRule>>> + Send;
}

pub trait ThemeSource: Send + Sync {
    fn fetch_active_themes(
        &self,
    ) -> impl Future<Output = StoreResult<Vec<SeasonalTheme>>> + Send;

    /// The theme governing `date`, highest priority first, lowest id on ties.
    fn resolve_active_theme(
        &self,
        date: Date,
    ) -> impl Future<Output = StoreResult<Option<SeasonalTheme>>> + Send {
        async move {
            let themes = self.fetch_active_themes().await?;
            Ok(resolve_active_theme(&themes, date).cloned())
        }
    }
}

/// Whether a content row could be linked to its entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentLink {
    Linked,
    /// The store has no place for the link. The content exists but the
    /// entry cannot reference it.
    Degraded,
}

pub trait CalendarStore: Send + Sync {
    /// Effective media of entries dated on or after `since`.
    fn fetch_recently_used_ids(
        &self,
        since: Date,
    ) -> impl Future<Output = StoreResult<HashSet<DbId>>> + Send;

    fn fetch_existing_keys(
        &self,
        start: Date,
        end: Date,
    ) -> impl Future<Output = StoreResult<HashSet<SlotKey>>> + Send;

    /// Insert or replace on `(post_date, slot_index)`, all or nothing.
    /// Returns the number of rows written.
    fn upsert_entries(
        &self,
        entries: &[NewCalendarEntry],
    ) -> impl Future<Output = StoreResult<u64>> + Send;

    fn fetch_entry(
        &self,
        id: DbId,
    ) -> impl Future<Output = StoreResult<Option<CalendarEntry>>> + Send;

    /// Entries in `[start, end]` ordered by date then slot.
    fn list_entries(
        &self,
        start: Date,
        end: Date,
        status: Option<EntryStatus>,
    ) -> impl Future<Output = StoreResult<Vec<CalendarEntry>>> + Send;

    fn update_status(
        &self,
        id: DbId,
        status: EntryStatus,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Set `published` and stamp `published_at`. Post id and permalink
    /// from an earlier scheduling call are kept.
    fn mark_published(
        &self,
        id: DbId,
        at: Timestamp,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Unlink the entry's content, mark its content rows discarded and
    /// move it to `status`.
    fn discard_content(
        &self,
        id: DbId,
        status: EntryStatus,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Store a manual media override with its fresh score.
    fn update_media(
        &self,
        id: DbId,
        media_id: DbId,
        score: Score,
        status: EntryStatus,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Record a successful publish and clear any previous error.
    fn record_publish(
        &self,
        id: DbId,
        status: EntryStatus,
        record: &PublishRecord,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    fn record_publish_error(
        &self,
        id: DbId,
        error: &str,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    fn clear_publish_error(&self, id: DbId) -> impl Future<Output = StoreResult<()>> + Send;

    /// Delete entries in `[start, end]`. Returns the number removed.
    fn delete_range(
        &self,
        start: Date,
        end: Date,
    ) -> impl Future<Output = StoreResult<u64>> + Send;
}

pub trait ContentStore: Send + Sync {
    fn insert_content(
        &self,
        content: &NewContent,
    ) -> impl Future<Output = StoreResult<GeneratedContent>> + Send;

    fn fetch_content(
        &self,
        id: DbId,
    ) -> impl Future<Output = StoreResult<Option<GeneratedContent>>> + Send;

    /// Latest content per calendar entry id, discarded rows excluded.
    fn fetch_content_for_entries(
        &self,
        entry_ids: &[DbId],
    ) -> impl Future<Output = StoreResult<HashMap<DbId, GeneratedContent>>> + Send;

    fn link_content(
        &self,
        entry_id: DbId,
        content_id: DbId,
    ) -> impl Future<Output = StoreResult<ContentLink>> + Send;
}

/// Every store contract the engine needs.
pub trait EditorialStore:
    MediaLibrary + PostingRuleSource + ThemeSource + CalendarStore + ContentStore
{
}

impl<T> EditorialStore for T where
    T: MediaLibrary + PostingRuleSource + ThemeSource + CalendarStore + ContentStore
{
}

// ---------------------------------------------------------------------------
// External services
// ---------------------------------------------------------------------------

/// The social platform publishing bridge.
pub trait Publisher: Send + Sync {
    fn publish(
        &self,
        request: &PublishRequest,
    ) -> impl Future<Output = Result<PublishReceipt, CollaboratorError>> + Send;
}

/// The caption generation service.
pub trait CaptionGenerator: Send + Sync {
    fn generate(
        &self,
        context: &SlotContext,
    ) -> impl Future<Output = Result<GeneratedCaptions, CollaboratorError>> + Send;
}
