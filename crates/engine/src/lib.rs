//! Editorial scheduling engine.
//!
//! Drives the pure domain logic in `editoria-core` against the collaborator
//! traits it declares:
//!
//! - [`EditorialEngine::generate`] fills a date range from the weekly rules.
//! - Lifecycle actions (`validate`, `skip`, `reset`, `mark_published`,
//!   `swap_media`) move single entries through the status state machine.
//! - [`EditorialEngine::attach_content`] and
//!   [`EditorialEngine::publish_entry`] bridge to the caption service and
//!   the publishing platform.
//! - [`batch`] runs caption generation and publishing over a range,
//!   sequentially, reporting per-item outcomes.

pub mod batch;
pub mod engine;
pub mod error;
pub mod publish;

pub use batch::{BatchItem, BatchSummary};
pub use engine::{Clock, EditorialEngine, GenerationReport, MediaSuggestion};
pub use error::{EngineError, EngineResult};
pub use publish::{AttachedContent, PublishOutcome};
