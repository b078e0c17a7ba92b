//! Calendar entry status state machine.
//!
//! ```text
//! planned ─► generated ─► content_ready ─► validated ─► scheduled ─► published
//!                                             └──────────────────────► published
//! ```
//!
//! Validation does not require a caption: `planned` and `generated` may go
//! straight to `validated`. `content_ready` and `validated` can be reset to
//! `generated` to discard a caption.
//!
//! `skipped` is reachable from every non-terminal status. `published` and
//! `skipped` are terminal for the current cycle; a regeneration with
//! overwrite replaces the row instead of transitioning it.

use crate::error::CoreError;

define_str_enum! {
    /// Status of a calendar entry.
    EntryStatus("status") {
        /// Slot exists but no media qualified.
        Planned = "planned",
        /// Media assigned, no caption yet.
        Generated = "generated",
        /// Caption attached.
        ContentReady = "content_ready",
        /// Approved for publishing.
        Validated = "validated",
        /// Handed to the publishing bridge with a future publish time.
        Scheduled = "scheduled",
        Published = "published",
        Skipped = "skipped",
    }
}

impl EntryStatus {
    /// Statuses reachable from `self`.
    pub fn valid_transitions(self) -> &'static [EntryStatus] {
        use EntryStatus::*;
        match self {
            Planned => &[Generated, ContentReady, Validated, Skipped],
            Generated => &[ContentReady, Validated, Skipped],
            // -> Generated is the reset that discards a caption.
            ContentReady => &[Validated, Generated, Skipped],
            Validated => &[Scheduled, Published, Generated, Skipped],
            Scheduled => &[Published, Skipped],
            Published | Skipped => &[],
        }
    }

    pub fn can_transition(self, to: EntryStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Validate a transition, returning [`CoreError::InvalidTransition`]
    /// for one the state machine does not allow.
    pub fn validate_transition(self, to: EntryStatus) -> Result<(), CoreError> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self.as_str(),
                to: to.as_str(),
            })
        }
    }

    pub fn is_terminal(self) -> bool {
        self.valid_transitions().is_empty()
    }

    /// Statuses a caption may be attached in.
    pub fn accepts_content(self) -> bool {
        matches!(
            self,
            EntryStatus::Planned | EntryStatus::Generated | EntryStatus::ContentReady
        )
    }

    /// Statuses whose media may still be swapped.
    ///
    /// A scheduled entry has already been handed to the publishing bridge
    /// with its media, so it is locked like a published one.
    pub fn accepts_media_swap(self) -> bool {
        matches!(
            self,
            EntryStatus::Planned
                | EntryStatus::Generated
                | EntryStatus::ContentReady
                | EntryStatus::Validated
        )
    }
}

/// Status an entry moves to after its media is swapped.
///
/// A swap never leaves an entry validated: approval applied to the old
/// media, so the entry drops back to `content_ready` when it has a caption
/// and to `generated` otherwise. A planned entry becomes generated once it
/// has media.
pub fn status_after_swap(
    current: EntryStatus,
    has_content: bool,
) -> Result<EntryStatus, CoreError> {
    if !current.accepts_media_swap() {
        return Err(CoreError::Conflict(format!(
            "Media cannot be swapped on a {current} entry"
        )));
    }
    Ok(match current {
        EntryStatus::Planned => EntryStatus::Generated,
        EntryStatus::Validated if has_content => EntryStatus::ContentReady,
        EntryStatus::Validated => EntryStatus::Generated,
        other => other,
    })
}

/// Status after a successful publishing bridge call.
pub fn status_after_publish(scheduled: bool) -> EntryStatus {
    if scheduled {
        EntryStatus::Scheduled
    } else {
        EntryStatus::Published
    }
}
