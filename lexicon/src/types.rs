//! Domain types for lexicon entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of categories an entry may carry.
pub const MAX_CATEGORIES: usize = 3;

/// Error returned when parsing one of the enumerations from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// The register a term is usually used in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Sarcastic,
    Sincere,
    Ironic,
    Playful,
    Serious,
    Neutral,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Sarcastic,
        Tone::Sincere,
        Tone::Ironic,
        Tone::Playful,
        Tone::Serious,
        Tone::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sarcastic => "sarcastic",
            Self::Sincere => "sincere",
            Self::Ironic => "ironic",
            Self::Playful => "playful",
            Self::Serious => "serious",
            Self::Neutral => "neutral",
        }
    }
}

impl FromStr for Tone {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("tone", s))
    }
}

/// Topic buckets used by the category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Emotions,
    Social,
    Fashion,
    Gaming,
    Internet,
    Food,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Emotions,
        Category::Social,
        Category::Fashion,
        Category::Gaming,
        Category::Internet,
        Category::Food,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emotions => "emotions",
            Self::Social => "social",
            Self::Fashion => "fashion",
            Self::Gaming => "gaming",
            Self::Internet => "internet",
            Self::Food => "food",
            Self::Other => "other",
        }
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("category", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Popularity decay, ordered from newest to oldest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    Fresh,
    Established,
    Waning,
    Cringe,
    Dead,
}

impl Freshness {
    pub const ALL: [Freshness; 5] = [
        Freshness::Fresh,
        Freshness::Established,
        Freshness::Waning,
        Freshness::Cringe,
        Freshness::Dead,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Established => "established",
            Self::Waning => "waning",
            Self::Cringe => "cringe",
            Self::Dead => "dead",
        }
    }

    /// Fill level of the freshness meter, out of 100.
    pub fn meter_value(&self) -> u8 {
        match self {
            Self::Fresh => 100,
            Self::Established => 75,
            Self::Waning => 50,
            Self::Cringe => 25,
            Self::Dead => 10,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fresh => "Fresh",
            Self::Established => "Established",
            Self::Waning => "Waning",
            Self::Cringe => "Cringe",
            Self::Dead => "Dead",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Fresh => "Hot off the press! Currently trending.",
            Self::Established => "Widely known and used.",
            Self::Waning => "Losing popularity, use with caution.",
            Self::Cringe => "Generally considered outdated or embarrassing.",
            Self::Dead => "Avoid using this term unless ironically.",
        }
    }
}

impl FromStr for Freshness {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("freshness", s))
    }
}

/// Where a term is used.
///
/// `Global` entries match every region query. `Unknown` is only assigned to
/// generated entries and also matches every query; it is not selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Region {
    #[default]
    Global,
    #[serde(rename = "US-East")]
    UsEast,
    #[serde(rename = "US-West")]
    UsWest,
    #[serde(rename = "UK")]
    Uk,
    #[serde(rename = "AU")]
    Au,
    Unknown,
}

impl Region {
    /// Regions offered by the region filter.
    pub const SELECTABLE: [Region; 5] = [
        Region::Global,
        Region::UsEast,
        Region::UsWest,
        Region::Uk,
        Region::Au,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::UsEast => "US-East",
            Self::UsWest => "US-West",
            Self::Uk => "UK",
            Self::Au => "AU",
            Self::Unknown => "Unknown",
        }
    }

    /// Entries in this region appear in every region-scoped query.
    pub fn is_universal(&self) -> bool {
        matches!(self, Self::Global | Self::Unknown)
    }
}

impl FromStr for Region {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SELECTABLE
            .into_iter()
            .chain(std::iter::once(Region::Unknown))
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("region", s))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reader-applied labels on community definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefinitionTag {
    Funny,
    Accurate,
    BoomerSafe,
    Satirical,
}

/// How the meaning of a word shifted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalMeaning {
    pub traditional_meaning: String,
    pub current_meaning: String,
}

/// A secondary, reader-submitted definition attached to an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityDefinition {
    pub id: String,
    pub definition: String,
    pub example: String,
    pub tone: Tone,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<DefinitionTag>,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub downvotes: u64,
    pub submitted_by: String,
    pub created_at: DateTime<Utc>,
}

/// Which external source a mention came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionKind {
    Tweet,
    ShortVideo,
    ForumPost,
}

impl MentionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tweet => "tweet",
            Self::ShortVideo => "short_video",
            Self::ForumPost => "forum_post",
        }
    }
}

/// A use of a term spotted on an external platform.
///
/// Tweets carry their text, short videos their caption, and forum posts a
/// title plus body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub author: String,
    pub text: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Mentions gathered from all three sources for one term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InTheWild {
    pub tweets: Vec<Mention>,
    pub short_videos: Vec<Mention>,
    pub forum_posts: Vec<Mention>,
}

impl InTheWild {
    pub fn is_empty(&self) -> bool {
        self.tweets.is_empty() && self.short_videos.is_empty() && self.forum_posts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.tweets.len() + self.short_videos.len() + self.forum_posts.len()
    }

    /// Slot for a given source.
    pub fn slot_mut(&mut self, kind: MentionKind) -> &mut Vec<Mention> {
        match kind {
            MentionKind::Tweet => &mut self.tweets,
            MentionKind::ShortVideo => &mut self.short_videos,
            MentionKind::ForumPost => &mut self.forum_posts,
        }
    }
}

/// A dictionary record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub term: String,
    pub definition: String,
    pub example: String,
    pub tone: Tone,
    pub categories: Vec<Category>,
    pub freshness: Freshness,
    #[serde(default)]
    pub region: Region,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub downvotes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    #[serde(default)]
    pub is_ai_generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub then_vs_now: Option<HistoricalMeaning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub community_definitions: Vec<CommunityDefinition>,
    /// Display-only attachment for precise single-term lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_the_wild: Option<InTheWild>,
}

impl Entry {
    /// Upvotes minus downvotes.
    pub fn net_score(&self) -> i64 {
        self.upvotes as i64 - self.downvotes as i64
    }

    pub fn shares_category(&self, categories: &[Category]) -> bool {
        self.categories.iter().any(|c| categories.contains(c))
    }

    pub fn definition(&self, definition_id: &str) -> Option<&CommunityDefinition> {
        self.community_definitions
            .iter()
            .find(|d| d.id == definition_id)
    }
}

/// Keep at most [`MAX_CATEGORIES`] distinct categories, preserving order.
pub fn truncate_categories(categories: Vec<Category>) -> Vec<Category> {
    let mut kept: Vec<Category> = Vec::with_capacity(MAX_CATEGORIES);
    for category in categories {
        if kept.len() == MAX_CATEGORIES {
            break;
        }
        if !kept.contains(&category) {
            kept.push(category);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_parse_accepts_display_names() {
        assert_eq!("US-East".parse::<Region>().unwrap(), Region::UsEast);
        assert_eq!("uk".parse::<Region>().unwrap(), Region::Uk);
        assert_eq!("Unknown".parse::<Region>().unwrap(), Region::Unknown);
        tokio_test::assert_err!("Mars".parse::<Region>());
    }

    #[test]
    fn test_region_serde_uses_display_names() {
        let json = serde_json::to_string(&Region::UsWest).unwrap();
        assert_eq!(json, "\"US-West\"");
        let parsed: Region = serde_json::from_str("\"AU\"").unwrap();
        assert_eq!(parsed, Region::Au);
    }

    #[test]
    fn test_definition_tag_kebab_case() {
        let json = serde_json::to_string(&DefinitionTag::BoomerSafe).unwrap();
        assert_eq!(json, "\"boomer-safe\"");
    }

    #[test]
    fn test_truncate_categories_dedups_and_caps() {
        let kept = truncate_categories(vec![
            Category::Social,
            Category::Social,
            Category::Internet,
            Category::Gaming,
            Category::Food,
        ]);
        assert_eq!(
            kept,
            vec![Category::Social, Category::Internet, Category::Gaming]
        );
    }

    #[test]
    fn test_freshness_meter_decays() {
        let values: Vec<u8> = Freshness::ALL.iter().map(|f| f.meter_value()).collect();
        assert_eq!(values, vec![100, 75, 50, 25, 10]);
        assert!(Freshness::Fresh < Freshness::Dead);
    }
}
