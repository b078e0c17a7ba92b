//! [`PgEditorialStore`]: the collaborator traits on PostgreSQL.

use std::collections::{HashMap, HashSet};

use editoria_core::calendar::{CalendarEntry, NewCalendarEntry};
use editoria_core::content::{GeneratedContent, NewContent};
use editoria_core::error::CoreError;
use editoria_core::lifecycle::EntryStatus;
use editoria_core::media::MediaAsset;
use editoria_core::ports::{
    CalendarStore, ContentLink, ContentStore, MediaLibrary, PostingRuleSource, StoreError,
    StoreResult, ThemeSource,
};
use editoria_core::publishing::PublishRecord;
use editoria_core::rules::PostingRule;
use editoria_core::scoring::Score;
use editoria_core::themes::SeasonalTheme;
use editoria_core::types::{Date, DbId, SlotKey, Timestamp};

use crate::models::into_domain;
use crate::repositories::{CalendarRepo, ContentRepo, MediaRepo, RuleRepo, ThemeRepo};
use crate::DbPool;

/// PostgreSQL error codes the store reacts to.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNDEFINED_COLUMN: &str = "42703";
const UNDEFINED_TABLE: &str = "42P01";

/// Store backed by a connection pool. Cheap to clone.
#[derive(Clone)]
pub struct PgEditorialStore {
    pool: DbPool,
}

impl PgEditorialStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Map a sqlx failure onto the store error vocabulary.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) | Some(FOREIGN_KEY_VIOLATION) => {
                StoreError::Conflict(db_err.message().to_string())
            }
            _ => StoreError::Query(db_err.message().to_string()),
        },
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(err.to_string()),
        _ => StoreError::Query(err.to_string()),
    }
}

/// A stored row did not convert into its domain type.
fn invalid_row(err: CoreError) -> StoreError {
    StoreError::Query(err.to_string())
}

/// True when the error says a column or table is missing from the schema.
fn is_missing_schema(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => matches!(
            db_err.code().as_deref(),
            Some(UNDEFINED_COLUMN) | Some(UNDEFINED_TABLE)
        ),
        _ => false,
    }
}

fn entry_updated(updated: bool, id: DbId) -> StoreResult<()> {
    if updated {
        Ok(())
    } else {
        Err(StoreError::NotFound {
            entity: "CalendarEntry",
            id,
        })
    }
}

impl MediaLibrary for PgEditorialStore {
    async fn fetch_eligible_media(&self) -> StoreResult<Vec<MediaAsset>> {
        let rows = MediaRepo::list_eligible(&self.pool)
            .await
            .map_err(store_error)?;
        into_domain(rows).map_err(invalid_row)
    }

    async fn fetch_media(&self, id: DbId) -> StoreResult<Option<MediaAsset>> {
        MediaRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)?
            .map(MediaAsset::try_from)
            .transpose()
            .map_err(invalid_row)
    }

    async fn fetch_media_by_ids(&self, ids: &[DbId]) -> StoreResult<HashMap<DbId, MediaAsset>> {
        let rows = MediaRepo::find_by_ids(&self.pool, ids)
            .await
            .map_err(store_error)?;
        let media: Vec<MediaAsset> = into_domain(rows).map_err(invalid_row)?;
        Ok(media.into_iter().map(|m| (m.id, m)).collect())
    }

    async fn record_usage(&self, id: DbId, at: Timestamp) -> StoreResult<()> {
        let updated = MediaRepo::record_usage(&self.pool, id, at)
            .await
            .map_err(store_error)?;
        if updated {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                entity: "MediaAsset",
                id,
            })
        }
    }
}

impl PostingRuleSource for PgEditorialStore {
    async fn fetch_active_rules(&self) -> StoreResult<Vec<PostingRule>> {
        let rows = RuleRepo::list_active(&self.pool)
            .await
            .map_err(store_error)?;
        into_domain(rows).map_err(invalid_row)
    }
}

impl ThemeSource for PgEditorialStore {
    async fn fetch_active_themes(&self) -> StoreResult<Vec<SeasonalTheme>> {
        let rows = ThemeRepo::list_active(&self.pool)
            .await
            .map_err(store_error)?;
        into_domain(rows).map_err(invalid_row)
    }
}

impl CalendarStore for PgEditorialStore {
    async fn fetch_recently_used_ids(&self, since: Date) -> StoreResult<HashSet<DbId>> {
        let ids = CalendarRepo::recently_used_media_ids(&self.pool, since)
            .await
            .map_err(store_error)?;
        Ok(ids.into_iter().collect())
    }

    async fn fetch_existing_keys(&self, start: Date, end: Date) -> StoreResult<HashSet<SlotKey>> {
        let keys = CalendarRepo::existing_keys(&self.pool, start, end)
            .await
            .map_err(store_error)?;
        Ok(keys.into_iter().collect())
    }

    async fn upsert_entries(&self, entries: &[NewCalendarEntry]) -> StoreResult<u64> {
        let written = CalendarRepo::upsert_many(&self.pool, entries)
            .await
            .map_err(store_error)?;
        tracing::debug!(requested = entries.len(), written, "Upserted calendar entries");
        Ok(written)
    }

    async fn fetch_entry(&self, id: DbId) -> StoreResult<Option<CalendarEntry>> {
        CalendarRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)?
            .map(CalendarEntry::try_from)
            .transpose()
            .map_err(invalid_row)
    }

    async fn list_entries(
        &self,
        start: Date,
        end: Date,
        status: Option<EntryStatus>,
    ) -> StoreResult<Vec<CalendarEntry>> {
        let rows = CalendarRepo::list_range(&self.pool, start, end, status)
            .await
            .map_err(store_error)?;
        into_domain(rows).map_err(invalid_row)
    }

    async fn update_status(&self, id: DbId, status: EntryStatus) -> StoreResult<()> {
        let updated = CalendarRepo::update_status(&self.pool, id, status)
            .await
            .map_err(store_error)?;
        entry_updated(updated, id)
    }

    async fn mark_published(&self, id: DbId, at: Timestamp) -> StoreResult<()> {
        let updated = CalendarRepo::mark_published(&self.pool, id, at)
            .await
            .map_err(store_error)?;
        entry_updated(updated, id)
    }

    /// On databases without the `content_id` column there is no link to
    /// drop, so only the content rows and the status change.
    async fn discard_content(&self, id: DbId, status: EntryStatus) -> StoreResult<()> {
        let discarded = ContentRepo::discard_for_entry(&self.pool, id)
            .await
            .map_err(store_error)?;
        tracing::debug!(entry_id = id, discarded, "Discarded entry content");
        match CalendarRepo::clear_content(&self.pool, id, status).await {
            Ok(updated) => entry_updated(updated, id),
            Err(e) if is_missing_schema(&e) => self.update_status(id, status).await,
            Err(e) => Err(store_error(e)),
        }
    }

    async fn update_media(
        &self,
        id: DbId,
        media_id: DbId,
        score: Score,
        status: EntryStatus,
    ) -> StoreResult<()> {
        let updated = CalendarRepo::update_media(&self.pool, id, media_id, &score, status)
            .await
            .map_err(store_error)?;
        entry_updated(updated, id)
    }

    async fn record_publish(
        &self,
        id: DbId,
        status: EntryStatus,
        record: &PublishRecord,
    ) -> StoreResult<()> {
        let updated = CalendarRepo::record_publish(&self.pool, id, status, record)
            .await
            .map_err(store_error)?;
        entry_updated(updated, id)
    }

    async fn record_publish_error(&self, id: DbId, error: &str) -> StoreResult<()> {
        let updated = CalendarRepo::set_publish_error(&self.pool, id, Some(error))
            .await
            .map_err(store_error)?;
        entry_updated(updated, id)
    }

    async fn clear_publish_error(&self, id: DbId) -> StoreResult<()> {
        let updated = CalendarRepo::set_publish_error(&self.pool, id, None)
            .await
            .map_err(store_error)?;
        entry_updated(updated, id)
    }

    async fn delete_range(&self, start: Date, end: Date) -> StoreResult<u64> {
        CalendarRepo::delete_range(&self.pool, start, end)
            .await
            .map_err(store_error)
    }
}

impl ContentStore for PgEditorialStore {
    async fn insert_content(&self, content: &NewContent) -> StoreResult<GeneratedContent> {
        let row = ContentRepo::create(&self.pool, content)
            .await
            .map_err(store_error)?;
        GeneratedContent::try_from(row).map_err(invalid_row)
    }

    async fn fetch_content(&self, id: DbId) -> StoreResult<Option<GeneratedContent>> {
        ContentRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)?
            .map(GeneratedContent::try_from)
            .transpose()
            .map_err(invalid_row)
    }

    async fn fetch_content_for_entries(
        &self,
        entry_ids: &[DbId],
    ) -> StoreResult<HashMap<DbId, GeneratedContent>> {
        let rows = ContentRepo::latest_for_entries(&self.pool, entry_ids)
            .await
            .map_err(store_error)?;
        let contents: Vec<GeneratedContent> = into_domain(rows).map_err(invalid_row)?;
        Ok(contents.into_iter().map(|c| (c.calendar_id, c)).collect())
    }

    /// Falls back to [`ContentLink::Degraded`] on databases that predate the
    /// `content_id` column.
    async fn link_content(&self, entry_id: DbId, content_id: DbId) -> StoreResult<ContentLink> {
        match CalendarRepo::link_content(&self.pool, entry_id, content_id).await {
            Ok(updated) => entry_updated(updated, entry_id).map(|()| ContentLink::Linked),
            Err(e) if is_missing_schema(&e) => {
                tracing::warn!(
                    entry_id,
                    content_id,
                    error = %e,
                    "Content link column unavailable"
                );
                Ok(ContentLink::Degraded)
            }
            Err(e) => Err(store_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_are_unavailable() {
        assert!(matches!(
            store_error(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            store_error(sqlx::Error::PoolClosed),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn other_failures_are_query_errors() {
        assert!(matches!(
            store_error(sqlx::Error::RowNotFound),
            StoreError::Query(_)
        ));
        assert!(!is_missing_schema(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn missing_row_is_not_found() {
        assert_eq!(
            entry_updated(false, 9),
            Err(StoreError::NotFound {
                entity: "CalendarEntry",
                id: 9
            })
        );
        assert_eq!(entry_updated(true, 9), Ok(()));
    }
}
