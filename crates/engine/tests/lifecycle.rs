//! Slot lifecycle operations: validate, skip, reset, swap, mark published.

mod common;

use assert_matches::assert_matches;

use common::*;
use editoria_core::content::CONTENT_STATUS_DISCARDED;
use editoria_core::error::CoreError;
use editoria_core::lifecycle::EntryStatus;
use editoria_core::media::{Category, MediaAsset, MediaKind};
use editoria_core::season::Season;
use editoria_engine::EngineError;

fn store_with_media() -> MemoryStore {
    MemoryStore::new(
        vec![
            room(1, 9),
            MediaAsset::new(2, Category::Room, MediaKind::Image, 10)
                .with_seasons(&[Season::Spring]),
            MediaAsset::new(3, Category::Dining, MediaKind::Image, 5),
        ],
        Vec::new(),
    )
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validating_a_generated_entry_without_content_succeeds() {
    let store = store_with_media();
    let id = store.seed_entry(monday(), 1, Some(1), EntryStatus::Generated);
    let (engine, store, _, _) = engine_with(store);

    let entry = engine.validate(id).await.unwrap();

    assert_eq!(entry.status, EntryStatus::Validated);
    assert_eq!(store.entry(id).status, EntryStatus::Validated);
    assert_eq!(store.entry(id).content_id, None);
}

#[tokio::test]
async fn validating_twice_is_an_invalid_transition() {
    let store = store_with_media();
    let id = store.seed_entry(monday(), 1, Some(1), EntryStatus::Validated);
    let (engine, _, _, _) = engine_with(store);

    let err = engine.validate(id).await.unwrap_err();
    assert_matches!(
        err,
        EngineError::Core(CoreError::InvalidTransition {
            from: "validated",
            to: "validated"
        })
    );
}

#[tokio::test]
async fn skip_is_terminal() {
    let store = store_with_media();
    let id = store.seed_entry(monday(), 1, None, EntryStatus::Planned);
    let (engine, store, _, _) = engine_with(store);

    engine.skip(id).await.unwrap();
    assert_eq!(store.entry(id).status, EntryStatus::Skipped);

    assert_matches!(
        engine.validate(id).await,
        Err(EngineError::Core(CoreError::InvalidTransition { .. }))
    );
    assert_matches!(
        engine.reset(id).await,
        Err(EngineError::Core(CoreError::InvalidTransition { .. }))
    );
}

#[tokio::test]
async fn reset_returns_content_ready_to_generated() {
    let store = store_with_media();
    let id = store.seed_entry(monday(), 1, Some(1), EntryStatus::ContentReady);
    let (engine, store, _, _) = engine_with(store);

    engine.reset(id).await.unwrap();
    assert_eq!(store.entry(id).status, EntryStatus::Generated);
}

#[tokio::test]
async fn reset_discards_the_caption() {
    let store = store_with_media();
    let id = store.seed_entry(monday(), 1, Some(1), EntryStatus::Generated);
    let (engine, store, _, _) = engine_with(store);
    let attached = engine.attach_content(id, new_content(id)).await.unwrap();
    engine.validate(id).await.unwrap();

    let entry = engine.reset(id).await.unwrap();

    assert_eq!(entry.status, EntryStatus::Generated);
    assert_eq!(entry.content_id, None);
    assert_eq!(store.entry(id).content_id, None);
    let status = store.with(|s| {
        s.contents
            .iter()
            .find(|c| c.id == attached.content.id)
            .map(|c| c.content_status.clone())
    });
    assert_eq!(status.as_deref(), Some(CONTENT_STATUS_DISCARDED));
}

#[tokio::test]
async fn unknown_entry_is_not_found() {
    let (engine, _, _, _) = engine_with(store_with_media());
    assert_matches!(
        engine.validate(999).await,
        Err(EngineError::Core(CoreError::NotFound {
            entity: "CalendarEntry",
            id: 999
        }))
    );
}

// ---------------------------------------------------------------------------
// Mark published and usage stats
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mark_published_records_usage_of_effective_media() {
    let store = store_with_media();
    let id = store.seed_entry(monday(), 1, Some(1), EntryStatus::Scheduled);
    store.with(|s| s.entries[0].manual_media_id = Some(2));
    let (engine, store, _, _) = engine_with(store);

    engine.mark_published(id).await.unwrap();

    assert_eq!(store.entry(id).status, EntryStatus::Published);
    let usage = store.with(|s| s.usage.clone());
    assert_eq!(usage, vec![(2, fixed_now())]);
    let media = store.with(|s| s.media.iter().find(|m| m.id == 2).cloned().unwrap());
    assert_eq!(media.used_count, 1);
    assert_eq!(media.last_used_at, Some(fixed_now()));
}

#[tokio::test]
async fn mark_published_stamps_publish_time_and_keeps_post_details() {
    let store = store_with_media();
    let id = store.seed_entry(monday(), 1, Some(1), EntryStatus::Scheduled);
    store.with(|s| {
        s.entries[0].post_id = Some("post-77".into());
        s.entries[0].permalink = Some("https://example.test/p/77".into());
    });
    let (engine, store, _, _) = engine_with(store);

    let entry = engine.mark_published(id).await.unwrap();

    assert_eq!(entry.published_at, Some(fixed_now()));
    let stored = store.entry(id);
    assert_eq!(stored.status, EntryStatus::Published);
    assert_eq!(stored.published_at, Some(fixed_now()));
    assert_eq!(stored.post_id.as_deref(), Some("post-77"));
    assert_eq!(stored.permalink.as_deref(), Some("https://example.test/p/77"));
}

#[tokio::test]
async fn mark_published_requires_validated_or_scheduled() {
    let store = store_with_media();
    let id = store.seed_entry(monday(), 1, Some(1), EntryStatus::Generated);
    let (engine, store, _, _) = engine_with(store);

    assert_matches!(
        engine.mark_published(id).await,
        Err(EngineError::Core(CoreError::InvalidTransition { .. }))
    );
    assert!(store.with(|s| s.usage.is_empty()));
}

// ---------------------------------------------------------------------------
// Manual media swap
// ---------------------------------------------------------------------------

#[tokio::test]
async fn swap_stores_override_and_fresh_score() {
    let store = store_with_media();
    let id = store.seed_entry(monday(), 1, Some(1), EntryStatus::Generated);
    let (engine, store, _, _) = engine_with(store);

    let entry = engine.swap_media(id, 2).await.unwrap();

    assert_eq!(entry.manual_media_id, Some(2));
    assert_eq!(entry.media_id, Some(1));
    assert_eq!(entry.effective_media_id(), Some(2));
    // room + exact spring + quality 10 + never used
    assert_eq!(entry.media_score, Some(85.0));
    assert_eq!(entry.score_breakdown.unwrap().season, 20.0);
    assert_eq!(store.entry(id).status, EntryStatus::Generated);
}

#[tokio::test]
async fn swap_on_planned_entry_makes_it_generated() {
    let store = store_with_media();
    let id = store.seed_entry(monday(), 1, None, EntryStatus::Planned);
    let (engine, _, _, _) = engine_with(store);

    let entry = engine.swap_media(id, 3).await.unwrap();
    assert_eq!(entry.status, EntryStatus::Generated);
    assert_eq!(entry.score_breakdown.unwrap().category, 0.0);
}

#[tokio::test]
async fn swap_after_validation_forces_revalidation() {
    let store = store_with_media();
    let with_caption = store.seed_entry(monday(), 1, Some(1), EntryStatus::Validated);
    let without_caption = store.seed_entry(monday(), 2, Some(1), EntryStatus::Validated);
    store.with(|s| s.entries[0].content_id = Some(77));
    let (engine, _, _, _) = engine_with(store);

    let a = engine.swap_media(with_caption, 2).await.unwrap();
    let b = engine.swap_media(without_caption, 2).await.unwrap();

    assert_eq!(a.status, EntryStatus::ContentReady);
    assert_eq!(b.status, EntryStatus::Generated);
}

#[tokio::test]
async fn swap_rejected_once_handed_to_the_bridge() {
    let store = store_with_media();
    let scheduled = store.seed_entry(monday(), 1, Some(1), EntryStatus::Scheduled);
    let published = store.seed_entry(monday(), 2, Some(1), EntryStatus::Published);
    let (engine, store, _, _) = engine_with(store);

    for id in [scheduled, published] {
        assert_matches!(
            engine.swap_media(id, 2).await,
            Err(EngineError::Core(CoreError::Conflict(_)))
        );
        assert_eq!(store.entry(id).manual_media_id, None);
    }
}

#[tokio::test]
async fn swap_to_unknown_media_is_not_found() {
    let store = store_with_media();
    let id = store.seed_entry(monday(), 1, Some(1), EntryStatus::Generated);
    let (engine, _, _, _) = engine_with(store);

    assert_matches!(
        engine.swap_media(id, 404).await,
        Err(EngineError::Core(CoreError::NotFound {
            entity: "MediaAsset",
            ..
        }))
    );
}

#[tokio::test]
async fn suggestions_rank_replacements_and_skip_recent_media() {
    let store = store_with_media();
    let id = store.seed_entry(monday(), 1, Some(1), EntryStatus::Generated);
    let (engine, _, _, _) = engine_with(store);

    let suggestions = engine.suggest_media(id, None).await.unwrap();

    let ids: Vec<_> = suggestions.iter().map(|s| s.media.id).collect();
    // 1 is assigned within the window, 3 is below the default quality floor.
    assert_eq!(ids, vec![2]);
    assert_eq!(suggestions[0].score.total, 85.0);
}
