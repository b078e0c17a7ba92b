//! Sequential batch operations over a date range.
//!
//! Items run one at a time with a pause between calls to external
//! services. A failing item is recorded and the batch moves on.

use std::time::Duration;

use serde::Serialize;

use editoria_core::calendar::CalendarEntry;
use editoria_core::lifecycle::EntryStatus;
use editoria_core::ports::{CaptionGenerator, EditorialStore, Publisher};
use editoria_core::publishing::PublishOptions;
use editoria_core::themes::validate_date_range;
use editoria_core::types::{Date, DbId};

use crate::engine::EditorialEngine;
use crate::error::EngineResult;

/// One item of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub entry_id: DbId,
    pub post_date: Date,
    pub success: bool,
    /// Entry status after the item ran.
    pub status: EntryStatus,
    pub error: Option<String>,
}

/// Success and failure counts of a batch run, with per-item detail.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub items: Vec<BatchItem>,
}

impl BatchSummary {
    fn push(&mut self, entry: &CalendarEntry, status: EntryStatus, error: Option<String>) {
        if error.is_none() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.items.push(BatchItem {
            entry_id: entry.id,
            post_date: entry.post_date,
            success: error.is_none(),
            status,
            error,
        });
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }
}

impl<S, P, C> EditorialEngine<S, P, C>
where
    S: EditorialStore,
    P: Publisher,
    C: CaptionGenerator,
{
    async fn pause(&self) {
        if self.config.batch_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.batch_delay_ms)).await;
        }
    }

    /// Publish every validated entry in `[start, end]`.
    ///
    /// Entries without content or media are counted as failures without
    /// calling the bridge.
    pub async fn publish_validated(
        &self,
        start: Date,
        end: Date,
        options: &PublishOptions,
    ) -> EngineResult<BatchSummary> {
        validate_date_range(start, end)?;
        let entries = self
            .store
            .list_entries(start, end, Some(EntryStatus::Validated))
            .await?;

        let entry_ids: Vec<DbId> = entries.iter().map(|e| e.id).collect();
        let mut contents = self.store.fetch_content_for_entries(&entry_ids).await?;
        let media_ids: Vec<DbId> = entries
            .iter()
            .filter_map(CalendarEntry::effective_media_id)
            .collect();
        let media = self.store.fetch_media_by_ids(&media_ids).await?;

        let mut summary = BatchSummary::default();
        let mut bridge_called = false;
        for entry in &entries {
            let Some(content) = contents.remove(&entry.id) else {
                summary.push(entry, entry.status, Some("No content".into()));
                continue;
            };
            let asset = entry
                .effective_media_id()
                .and_then(|id| media.get(&id).cloned());
            let Some(asset) = asset else {
                summary.push(entry, entry.status, Some("No media".into()));
                continue;
            };

            // Pace bridge calls; items that never reach the bridge don't wait.
            if bridge_called {
                self.pause().await;
            }
            bridge_called = true;
            match self.publish_loaded(entry, &content, asset, options).await {
                Ok(outcome) => summary.push(entry, outcome.status, outcome.error),
                Err(e) => summary.push(entry, entry.status, Some(e.to_string())),
            }
        }

        tracing::info!(
            %start,
            %end,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Batch publish finished"
        );
        Ok(summary)
    }

    /// Generate captions for every entry in `[start, end]` that has media
    /// but no content yet.
    pub async fn generate_captions(
        &self,
        start: Date,
        end: Date,
        cta_override: Option<&str>,
    ) -> EngineResult<BatchSummary> {
        validate_date_range(start, end)?;
        let entries = self.store.list_entries(start, end, None).await?;

        let entry_ids: Vec<DbId> = entries.iter().map(|e| e.id).collect();
        let contents = self.store.fetch_content_for_entries(&entry_ids).await?;

        let pending: Vec<&CalendarEntry> = entries
            .iter()
            .filter(|e| matches!(e.status, EntryStatus::Planned | EntryStatus::Generated))
            .filter(|e| e.effective_media_id().is_some())
            .filter(|e| e.content_id.is_none() && !contents.contains_key(&e.id))
            .collect();

        let mut summary = BatchSummary::default();
        for (i, entry) in pending.iter().enumerate() {
            if i > 0 {
                self.pause().await;
            }
            match self.generate_caption(entry.id, cta_override).await {
                Ok(attached) => summary.push(entry, attached.status, None),
                Err(e) => summary.push(entry, entry.status, Some(e.to_string())),
            }
        }

        tracing::info!(
            %start,
            %end,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Batch caption generation finished"
        );
        Ok(summary)
    }
}
