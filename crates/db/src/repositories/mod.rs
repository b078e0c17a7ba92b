//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument and return raw rows.

pub mod calendar_repo;
pub mod content_repo;
pub mod media_repo;
pub mod rule_repo;
pub mod theme_repo;

pub use calendar_repo::CalendarRepo;
pub use content_repo::ContentRepo;
pub use media_repo::MediaRepo;
pub use rule_repo::RuleRepo;
pub use theme_repo::ThemeRepo;
