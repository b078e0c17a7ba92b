//! Publish request assembly and publish-time resolution.

use chrono::{Duration, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarEntry;
use crate::content::{
    resolve_caption, resolve_multilingual_caption, CaptionVariant, GeneratedContent, Language,
};
use crate::error::CoreError;
use crate::media::MediaAsset;
use crate::rules::{parse_time_slot, DEFAULT_TIME_SLOT};
use crate::types::{DbId, Timestamp};

/// Caption and scheduling choices for a publish call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishOptions {
    pub variant: CaptionVariant,
    pub language: Language,
    /// Stack es/en/fr captions in one post.
    pub multilingual: bool,
    /// Schedule posts whose slot time is still ahead instead of posting now.
    pub schedule: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            variant: CaptionVariant::Short,
            language: Language::Es,
            multilingual: true,
            schedule: true,
        }
    }
}

/// Everything the publishing bridge needs for one post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub entry_id: DbId,
    pub media: MediaAsset,
    pub caption: String,
    /// `None` publishes immediately.
    pub scheduled_time: Option<Timestamp>,
}

/// What the publishing bridge reports back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishReceipt {
    pub post_id: Option<String>,
    pub permalink: Option<String>,
    pub container_id: Option<String>,
}

/// Publish metadata recorded on an entry after a successful call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRecord {
    pub receipt: PublishReceipt,
    pub scheduled_at: Option<Timestamp>,
    pub published_at: Option<Timestamp>,
}

impl PublishRecord {
    /// A record for `receipt`. Scheduled posts have no `published_at` yet.
    pub fn new(receipt: PublishReceipt, scheduled_time: Option<Timestamp>, now: Timestamp) -> Self {
        Self {
            receipt,
            scheduled_at: scheduled_time,
            published_at: scheduled_time.is_none().then_some(now),
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled_at.is_some()
    }
}

/// Instant the entry's slot is due, reading the time slot as UTC.
pub fn slot_instant(entry: &CalendarEntry) -> Result<Timestamp, CoreError> {
    let time = parse_time_slot(entry.time_slot.as_deref().unwrap_or(DEFAULT_TIME_SLOT))?;
    Ok(Utc.from_utc_datetime(&NaiveDateTime::new(entry.post_date, time)))
}

/// When the bridge should publish the entry.
///
/// A slot still in the future is scheduled, never sooner than
/// `now + min_lead_secs`. A slot already due (or an unparseable time slot)
/// publishes immediately and yields `None`.
pub fn resolve_publish_time(
    entry: &CalendarEntry,
    schedule: bool,
    now: Timestamp,
    min_lead_secs: i64,
) -> Option<Timestamp> {
    if !schedule {
        return None;
    }
    let due = slot_instant(entry).ok()?;
    (due > now).then(|| due.max(now + Duration::seconds(min_lead_secs)))
}

/// Caption for `content` following `options`.
pub fn caption_for(
    content: &GeneratedContent,
    media: &MediaAsset,
    options: &PublishOptions,
) -> Result<String, CoreError> {
    if options.multilingual {
        resolve_multilingual_caption(content, media.kind, options.variant)
    } else {
        resolve_caption(content, media.kind, options.variant, options.language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::EntryStatus;
    use crate::types::Date;

    fn entry(date: Date, time_slot: Option<&str>) -> CalendarEntry {
        CalendarEntry {
            id: 1,
            post_date: date,
            slot_index: 1,
            time_slot: time_slot.map(str::to_string),
            rule_id: None,
            target_category: None,
            target_format: None,
            season_context: None,
            theme_id: None,
            theme_name: None,
            media_id: Some(1),
            manual_media_id: None,
            media_score: None,
            score_breakdown: None,
            status: EntryStatus::Validated,
            content_id: None,
            post_id: None,
            permalink: None,
            container_id: None,
            scheduled_at: None,
            published_at: None,
            publish_error: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn future_slot_is_scheduled_at_slot_time() {
        let e = entry(Date::from_ymd_opt(2026, 5, 10).unwrap(), Some("18:30"));
        let now = at(2026, 5, 9, 12, 0);
        assert_eq!(resolve_publish_time(&e, true, now, 600), Some(at(2026, 5, 10, 18, 30)));
    }

    #[test]
    fn imminent_slot_pushed_to_minimum_lead() {
        let e = entry(Date::from_ymd_opt(2026, 5, 10).unwrap(), Some("10:05"));
        let now = at(2026, 5, 10, 10, 0);
        assert_eq!(resolve_publish_time(&e, true, now, 600), Some(at(2026, 5, 10, 10, 10)));
    }

    #[test]
    fn past_slot_publishes_now() {
        let e = entry(Date::from_ymd_opt(2026, 5, 10).unwrap(), None);
        let now = at(2026, 5, 10, 10, 0);
        assert_eq!(resolve_publish_time(&e, true, now, 600), None);
    }

    #[test]
    fn missing_time_slot_defaults_to_ten() {
        let e = entry(Date::from_ymd_opt(2026, 5, 10).unwrap(), None);
        assert_eq!(slot_instant(&e).unwrap(), at(2026, 5, 10, 10, 0));
    }

    #[test]
    fn scheduling_disabled_publishes_now() {
        let e = entry(Date::from_ymd_opt(2030, 1, 1).unwrap(), Some("09:00"));
        assert_eq!(resolve_publish_time(&e, false, at(2026, 1, 1, 0, 0), 600), None);
    }

    #[test]
    fn garbage_time_slot_publishes_now() {
        let e = entry(Date::from_ymd_opt(2030, 1, 1).unwrap(), Some("noon"));
        assert_eq!(resolve_publish_time(&e, true, at(2026, 1, 1, 0, 0), 600), None);
    }

    #[test]
    fn record_sets_published_at_only_when_immediate() {
        let now = at(2026, 5, 10, 10, 0);
        let live = PublishRecord::new(PublishReceipt::default(), None, now);
        assert_eq!(live.published_at, Some(now));
        assert!(!live.is_scheduled());

        let later = PublishRecord::new(PublishReceipt::default(), Some(at(2026, 5, 11, 9, 0)), now);
        assert_eq!(later.published_at, None);
        assert!(later.is_scheduled());
    }
}
