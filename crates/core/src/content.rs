//! Generated captions, slot context for the caption service, and caption
//! resolution for publishing.

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarEntry;
use crate::error::CoreError;
use crate::media::{MediaAsset, MediaKind};
use crate::season::Season;
use crate::themes::{SeasonalTheme, DEFAULT_CTA};
use crate::types::{DbId, Timestamp};

/// Status given to freshly generated content.
pub const CONTENT_STATUS_DRAFT: &str = "draft";

/// Status of content dropped by a reset. Never published or reused.
pub const CONTENT_STATUS_DISCARDED: &str = "discarded";

/// Order tried when the requested variant has no text.
const VARIANT_FALLBACK: [CaptionVariant; 3] =
    [CaptionVariant::Short, CaptionVariant::Story, CaptionVariant::Reel];

define_str_enum! {
    /// Caption length/style variant.
    CaptionVariant("caption variant") {
        Short = "short",
        Story = "story",
        Reel = "reel",
    }
}

define_str_enum! {
    /// Caption language.
    Language("language") {
        Es = "es",
        En = "en",
        Fr = "fr",
    }
}

impl Language {
    /// Prefix line used when languages are stacked in one caption.
    fn flag(self) -> Option<&'static str> {
        match self {
            Language::Es => None,
            Language::En => Some("\u{1F1EC}\u{1F1E7}"),
            Language::Fr => Some("\u{1F1EB}\u{1F1F7}"),
        }
    }
}

/// One caption in each language. Empty strings mean "not written".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizedText {
    pub es: String,
    pub en: String,
    pub fr: String,
}

impl LocalizedText {
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Es => &self.es,
            Language::En => &self.en,
            Language::Fr => &self.fr,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.es.is_empty() && self.en.is_empty() && self.fr.is_empty()
    }
}

/// Every caption variant for a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionSet {
    pub short: LocalizedText,
    pub story: LocalizedText,
    /// Only filled for video media.
    pub reel: LocalizedText,
}

impl CaptionSet {
    pub fn variant(&self, variant: CaptionVariant) -> &LocalizedText {
        match variant {
            CaptionVariant::Short => &self.short,
            CaptionVariant::Story => &self.story,
            CaptionVariant::Reel => &self.reel,
        }
    }

    /// Text for `variant` in `language`, `None` when empty.
    pub fn text(&self, variant: CaptionVariant, language: Language) -> Option<&str> {
        Some(self.variant(variant).get(language)).filter(|t| !t.is_empty())
    }
}

/// Token usage and cost reported by the caption service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionUsage {
    pub model: Option<String>,
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub cost_usd: f64,
}

/// Output of the caption generation service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedCaptions {
    pub captions: CaptionSet,
    pub hashtags: Vec<String>,
    pub usage: CaptionUsage,
}

/// Stored caption content linked to a calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub id: DbId,
    pub calendar_id: DbId,
    pub media_id: Option<DbId>,
    pub captions: CaptionSet,
    pub hashtags: Vec<String>,
    pub usage: CaptionUsage,
    pub generation_params: serde_json::Value,
    pub content_status: String,
    pub created_at: Timestamp,
}

/// Content to insert for an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContent {
    pub calendar_id: DbId,
    pub media_id: Option<DbId>,
    pub captions: CaptionSet,
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub usage: CaptionUsage,
    #[serde(default)]
    pub generation_params: serde_json::Value,
}

impl NewContent {
    /// Build the row for captions generated from `context`. Reel captions
    /// are dropped for images.
    pub fn from_generated(
        calendar_id: DbId,
        context: &SlotContext,
        generated: GeneratedCaptions,
    ) -> Self {
        let mut captions = generated.captions;
        if !context.media.is_video() {
            captions.reel = LocalizedText::default();
        }
        Self {
            calendar_id,
            media_id: Some(context.media.id),
            captions,
            hashtags: generated.hashtags,
            usage: generated.usage,
            generation_params: serde_json::json!({
                "theme": context.theme_name,
                "season": context.season,
                "cta_type": context.cta,
            }),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let c = &self.captions;
        if c.short.is_empty() && c.story.is_empty() && c.reel.is_empty() {
            return Err(CoreError::Validation(
                "Content must contain at least one caption".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Slot context
// ---------------------------------------------------------------------------

/// What the caption service needs to know about a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotContext {
    pub entry_id: DbId,
    pub media: MediaAsset,
    pub theme_name: Option<String>,
    pub season: Season,
    pub cta: String,
}

/// Assemble the caption context of `entry`.
///
/// `media` must be the entry's effective media. The theme name comes from
/// the live theme when one still governs the date, otherwise from the
/// entry's snapshot. `cta_override` beats the theme's CTA.
pub fn resolve_slot_context(
    entry: &CalendarEntry,
    media: MediaAsset,
    theme: Option<&SeasonalTheme>,
    cta_override: Option<&str>,
) -> SlotContext {
    let live_theme = theme.filter(|_| entry.theme_id.is_some());
    let theme_name = live_theme
        .map(|t| t.theme_name.clone())
        .or_else(|| entry.theme_name.clone());
    let cta = cta_override
        .or_else(|| live_theme.map(SeasonalTheme::cta))
        .unwrap_or(DEFAULT_CTA)
        .to_string();

    SlotContext {
        entry_id: entry.id,
        media,
        theme_name,
        season: entry.season(),
        cta,
    }
}

// ---------------------------------------------------------------------------
// Caption resolution
// ---------------------------------------------------------------------------

fn effective_variant(kind: MediaKind, variant: CaptionVariant) -> CaptionVariant {
    if kind == MediaKind::Video {
        CaptionVariant::Reel
    } else {
        variant
    }
}

fn append_hashtags(mut text: String, hashtags: &[String]) -> String {
    if !hashtags.is_empty() {
        let tags: Vec<String> = hashtags.iter().map(|h| format!("#{h}")).collect();
        text.push_str("\n\n");
        text.push_str(&tags.join(" "));
    }
    text
}

/// Final caption in one language.
///
/// Videos always use the reel variant. When the chosen variant is empty the
/// short, story and reel variants are tried in that order.
pub fn resolve_caption(
    content: &GeneratedContent,
    kind: MediaKind,
    variant: CaptionVariant,
    language: Language,
) -> Result<String, CoreError> {
    let variant = effective_variant(kind, variant);
    let text = content
        .captions
        .text(variant, language)
        .or_else(|| {
            VARIANT_FALLBACK
                .iter()
                .find_map(|v| content.captions.text(*v, language))
        })
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "No caption found for {variant}/{language} (or fallbacks) in content {}",
                content.id
            ))
        })?;

    Ok(append_hashtags(text.to_string(), &content.hashtags))
}

/// Spanish, English and French captions stacked in one post, each foreign
/// block prefixed with its flag. Languages with no text are left out.
pub fn resolve_multilingual_caption(
    content: &GeneratedContent,
    kind: MediaKind,
    variant: CaptionVariant,
) -> Result<String, CoreError> {
    let variant = effective_variant(kind, variant);
    let parts: Vec<String> = Language::ALL
        .iter()
        .filter_map(|lang| {
            content.captions.text(variant, *lang).map(|text| match lang.flag() {
                Some(flag) => format!("{flag}\n{text}"),
                None => text.to_string(),
            })
        })
        .collect();

    if parts.is_empty() {
        return Err(CoreError::Validation(format!(
            "No captions found for variant={variant} in content {}",
            content.id
        )));
    }

    Ok(append_hashtags(parts.join("\n\n"), &content.hashtags))
}
