//! Tagged media assets as seen by the scheduler.
//!
//! Assets are created by the ingestion pipeline and only read here. The one
//! write path is usage bookkeeping once a post goes live.

use serde::{Deserialize, Serialize};

use crate::season::Season;
use crate::types::{DbId, Timestamp};

/// Lowest accepted quality score.
pub const MIN_QUALITY: i16 = 1;

/// Highest accepted quality score.
pub const MAX_QUALITY: i16 = 10;

/// Ingestion status of assets eligible for scheduling.
pub const STATUS_ANALYZED: &str = "analyzed";

define_str_enum! {
    /// Top-level content category of an asset.
    Category("category") {
        Room = "room",
        CommonArea = "common_area" | "common-area",
        Exterior = "exterior",
        Dining = "dining",
        Experience = "experience",
    }
}

define_str_enum! {
    /// Image or video.
    MediaKind("media kind") {
        Image = "image",
        Video = "video",
    }
}

/// Clamp a raw quality score into `[MIN_QUALITY, MAX_QUALITY]`.
pub fn clamp_quality(raw: i16) -> i16 {
    raw.clamp(MIN_QUALITY, MAX_QUALITY)
}

/// A tagged media asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub id: DbId,
    pub category: Category,
    pub subcategory: Option<String>,
    pub ambiance: Vec<String>,
    pub seasons: Vec<Season>,
    pub elements: Vec<String>,
    /// Always within `[MIN_QUALITY, MAX_QUALITY]`; see [`MediaAsset::new`].
    pub quality: i16,
    pub aspect_ratio: Option<String>,
    pub kind: MediaKind,
    pub file_name: Option<String>,
    pub used_count: i32,
    pub last_used_at: Option<Timestamp>,
}

impl MediaAsset {
    /// Build an untagged, never-used asset. The quality is clamped.
    pub fn new(id: DbId, category: Category, kind: MediaKind, quality: i16) -> Self {
        Self {
            id,
            category,
            subcategory: None,
            ambiance: Vec::new(),
            seasons: Vec::new(),
            elements: Vec::new(),
            quality: clamp_quality(quality),
            aspect_ratio: None,
            kind,
            file_name: None,
            used_count: 0,
            last_used_at: None,
        }
    }

    /// True when the asset has never been posted.
    pub fn is_unused(&self) -> bool {
        self.used_count == 0 || self.last_used_at.is_none()
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    pub fn with_seasons(mut self, seasons: &[Season]) -> Self {
        self.seasons = seasons.to_vec();
        self
    }

    pub fn with_ambiance(mut self, tags: &[&str]) -> Self {
        self.ambiance = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_elements(mut self, tags: &[&str]) -> Self {
        self.elements = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: &str) -> Self {
        self.aspect_ratio = Some(ratio.to_string());
        self
    }

    pub fn with_usage(mut self, used_count: i32, last_used_at: Option<Timestamp>) -> Self {
        self.used_count = used_count;
        self.last_used_at = last_used_at;
        self
    }
}
