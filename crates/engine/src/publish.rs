//! Caption attachment and publishing for single entries.

use serde::Serialize;

use editoria_core::calendar::CalendarEntry;
use editoria_core::content::{resolve_slot_context, GeneratedContent, NewContent};
use editoria_core::error::CoreError;
use editoria_core::lifecycle::{status_after_publish, EntryStatus};
use editoria_core::media::MediaAsset;
use editoria_core::ports::{CaptionGenerator, ContentLink, EditorialStore, Publisher};
use editoria_core::publishing::{
    caption_for, resolve_publish_time, PublishOptions, PublishRecord, PublishRequest,
};
use editoria_core::types::{DbId, Timestamp};

use crate::engine::EditorialEngine;
use crate::error::EngineResult;

/// Content stored for an entry and how it was linked.
#[derive(Debug, Clone, Serialize)]
pub struct AttachedContent {
    pub content: GeneratedContent,
    /// False when the store could not link the content to the entry.
    pub linked: bool,
    pub status: EntryStatus,
}

/// Result of one publish attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishOutcome {
    pub entry_id: DbId,
    pub success: bool,
    pub status: EntryStatus,
    pub post_id: Option<String>,
    pub permalink: Option<String>,
    pub scheduled_time: Option<Timestamp>,
    pub error: Option<String>,
}

impl PublishOutcome {
    fn failed(entry: &CalendarEntry, error: String) -> Self {
        Self {
            entry_id: entry.id,
            success: false,
            status: entry.status,
            post_id: None,
            permalink: None,
            scheduled_time: None,
            error: Some(error),
        }
    }
}

impl<S, P, C> EditorialEngine<S, P, C>
where
    S: EditorialStore,
    P: Publisher,
    C: CaptionGenerator,
{
    // -----------------------------------------------------------------------
    // Content
    // -----------------------------------------------------------------------

    /// Store `content` for an entry and advance it to `content_ready`.
    ///
    /// When the store cannot link content to entries the content is kept
    /// and the entry is set to `generated` instead.
    pub async fn attach_content(
        &self,
        id: DbId,
        content: NewContent,
    ) -> EngineResult<AttachedContent> {
        let entry = self.get_entry(id).await?;
        if !entry.status.accepts_content() {
            return Err(CoreError::Conflict(format!(
                "Content cannot be attached to a {} entry",
                entry.status
            ))
            .into());
        }
        content.validate()?;

        let stored = self.store.insert_content(&content).await?;
        let link = self.store.link_content(id, stored.id).await?;

        let status = match link {
            ContentLink::Linked => EntryStatus::ContentReady,
            ContentLink::Degraded => {
                tracing::warn!(
                    entry_id = id,
                    content_id = stored.id,
                    "Content stored without calendar link"
                );
                EntryStatus::Generated
            }
        };
        if status != entry.status {
            self.store.update_status(id, status).await?;
        }

        tracing::info!(entry_id = id, content_id = stored.id, status = %status, "Content attached");
        Ok(AttachedContent {
            content: stored,
            linked: link == ContentLink::Linked,
            status,
        })
    }

    /// Generate captions for an entry's media and attach them.
    ///
    /// A caption service failure leaves the entry untouched.
    pub async fn generate_caption(
        &self,
        id: DbId,
        cta_override: Option<&str>,
    ) -> EngineResult<AttachedContent> {
        let entry = self.get_entry(id).await?;
        if !entry.status.accepts_content() {
            return Err(CoreError::Conflict(format!(
                "Captions cannot be generated for a {} entry",
                entry.status
            ))
            .into());
        }
        let media = self.effective_media(&entry).await?;
        let theme = self.store.resolve_active_theme(entry.post_date).await?;
        let context = resolve_slot_context(&entry, media, theme.as_ref(), cta_override);

        let generated = self.captions.generate(&context).await.inspect_err(|e| {
            tracing::warn!(entry_id = id, error = %e, "Caption generation failed");
        })?;

        let content = NewContent::from_generated(id, &context, generated);
        self.attach_content(id, content).await
    }

    /// The media that will be posted for `entry`.
    async fn effective_media(&self, entry: &CalendarEntry) -> EngineResult<MediaAsset> {
        let media_id = entry.effective_media_id().ok_or_else(|| {
            CoreError::Validation(format!("Calendar entry {} has no media assigned", entry.id))
        })?;
        let media = self.store.fetch_media(media_id).await?.ok_or(CoreError::NotFound {
            entity: "MediaAsset",
            id: media_id,
        })?;
        Ok(media)
    }

    /// Content for `entry`, by link when present, else the latest row
    /// written for it.
    pub(crate) async fn entry_content(
        &self,
        entry: &CalendarEntry,
    ) -> EngineResult<Option<GeneratedContent>> {
        if let Some(content_id) = entry.content_id {
            if let Some(content) = self.store.fetch_content(content_id).await? {
                return Ok(Some(content));
            }
        }
        let mut by_entry = self.store.fetch_content_for_entries(&[entry.id]).await?;
        Ok(by_entry.remove(&entry.id))
    }

    // -----------------------------------------------------------------------
    // Publishing
    // -----------------------------------------------------------------------

    /// Publish one validated entry through the publishing bridge.
    ///
    /// Bridge and caption failures are recorded on the entry, leave it
    /// `validated`, and come back as an unsuccessful outcome. Store failures
    /// are returned as errors.
    pub async fn publish_entry(
        &self,
        id: DbId,
        options: &PublishOptions,
    ) -> EngineResult<PublishOutcome> {
        let entry = self.get_entry(id).await?;
        ensure_publishable(&entry)?;

        let content = match self.entry_content(&entry).await? {
            Some(content) => content,
            None => return self.fail_publish(&entry, "No content".into()).await,
        };
        let media = match entry.effective_media_id() {
            Some(media_id) => self.store.fetch_media(media_id).await?,
            None => None,
        };
        let Some(media) = media else {
            return self.fail_publish(&entry, "No media".into()).await;
        };

        self.publish_loaded(&entry, &content, media, options).await
    }

    /// Publish with content and media already resolved.
    pub(crate) async fn publish_loaded(
        &self,
        entry: &CalendarEntry,
        content: &GeneratedContent,
        media: MediaAsset,
        options: &PublishOptions,
    ) -> EngineResult<PublishOutcome> {
        ensure_publishable(entry)?;
        self.store.clear_publish_error(entry.id).await?;

        let caption = match caption_for(content, &media, options) {
            Ok(caption) => caption,
            Err(e) => return self.fail_publish(entry, e.to_string()).await,
        };

        let now = self.now();
        let scheduled_time = resolve_publish_time(
            entry,
            options.schedule,
            now,
            self.config.publish_min_lead_secs,
        );
        let request = PublishRequest {
            entry_id: entry.id,
            media,
            caption,
            scheduled_time,
        };

        let receipt = match self.publisher.publish(&request).await {
            Ok(receipt) => receipt,
            Err(e) => return self.fail_publish(entry, e.to_string()).await,
        };

        let record = PublishRecord::new(receipt, scheduled_time, now);
        let status = status_after_publish(record.is_scheduled());
        self.store.record_publish(entry.id, status, &record).await?;

        tracing::info!(
            entry_id = entry.id,
            status = %status,
            post_id = record.receipt.post_id.as_deref(),
            scheduled_time = ?scheduled_time,
            "Entry published"
        );

        if status == EntryStatus::Published {
            self.record_usage(entry).await;
        }

        Ok(PublishOutcome {
            entry_id: entry.id,
            success: true,
            status,
            post_id: record.receipt.post_id,
            permalink: record.receipt.permalink,
            scheduled_time,
            error: None,
        })
    }

    async fn fail_publish(
        &self,
        entry: &CalendarEntry,
        error: String,
    ) -> EngineResult<PublishOutcome> {
        tracing::warn!(entry_id = entry.id, error = %error, "Publish failed");
        self.store.record_publish_error(entry.id, &error).await?;
        Ok(PublishOutcome::failed(entry, error))
    }
}

fn ensure_publishable(entry: &CalendarEntry) -> Result<(), CoreError> {
    if entry.status == EntryStatus::Validated {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Only validated entries can be published, entry {} is {}",
            entry.id, entry.status
        )))
    }
}
