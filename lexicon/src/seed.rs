//! Seed data.
//!
//! The built-in bundle is what every session starts from unless the gateway
//! is pointed at a seed file. Files may be JSON or YAML; the format is picked
//! from the extension.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::battle::{BattlePair, BattleTerm};
use crate::store::{EntryStore, StoreError};
use crate::traps::BoomerTrap;
use crate::types::*;

/// Errors raised while loading seed data.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON seed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML seed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid seed entries: {0}")]
    Store(#[from] StoreError),
}

/// Everything a session is initialised from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedBundle {
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub battles: Vec<BattlePair>,
    #[serde(default)]
    pub traps: Vec<BoomerTrap>,
}

impl SeedBundle {
    /// Parse a JSON seed document.
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        let bundle: Self = serde_json::from_str(json)?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Parse a YAML seed document.
    pub fn from_yaml(yaml: &str) -> Result<Self, SeedError> {
        let bundle: Self = serde_yaml::from_str(yaml)?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Load a seed file, choosing the parser from the extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&raw),
            _ => Self::from_json(&raw),
        }
    }

    /// Build a fresh store for one session.
    pub fn store(&self) -> EntryStore {
        // Entries were validated when the bundle was built.
        EntryStore::from_entries(self.entries.iter().cloned()).unwrap_or_default()
    }

    fn validate(&self) -> Result<(), StoreError> {
        EntryStore::from_entries(self.entries.iter().cloned()).map(|_| ())
    }
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    term: &str,
    definition: &str,
    example: &str,
    tone: Tone,
    categories: &[Category],
    freshness: Freshness,
    region: Region,
    created_at: DateTime<Utc>,
    upvotes: u64,
    downvotes: u64,
) -> Entry {
    Entry {
        id: id.to_string(),
        term: term.to_string(),
        definition: definition.to_string(),
        example: example.to_string(),
        tone,
        categories: categories.to_vec(),
        freshness,
        region,
        created_at,
        upvotes,
        downvotes,
        submitted_by: None,
        is_ai_generated: false,
        then_vs_now: None,
        origin: None,
        pronunciation_url: None,
        community_definitions: Vec::new(),
        in_the_wild: None,
    }
}

/// The built-in entries.
pub fn default_entries() -> Vec<Entry> {
    let mut rizz = entry(
        "1",
        "Rizz",
        "Short for charisma; the ability to charm or flirt successfully.",
        "He's got unspoken rizz.",
        Tone::Playful,
        &[Category::Social],
        Freshness::Fresh,
        Region::Global,
        date(2023, 6, 1),
        1502,
        55,
    );
    rizz.submitted_by = Some("ZMaster".to_string());
    rizz.origin = Some("Popularized by streamer Kai Cenat".to_string());
    rizz.then_vs_now = Some(HistoricalMeaning {
        traditional_meaning: "Not applicable (new term)".to_string(),
        current_meaning: "Skill in charming potential romantic partners.".to_string(),
    });
    rizz.community_definitions = vec![
        CommunityDefinition {
            id: "def1-1".to_string(),
            definition: "Like, when someone's smooth with words and actions, especially when flirting."
                .to_string(),
            example: "Dude walked up to her and just started rizzing, it was wild.".to_string(),
            tone: Tone::Playful,
            tags: vec![DefinitionTag::Accurate],
            upvotes: 120,
            downvotes: 5,
            submitted_by: "User123".to_string(),
            created_at: date(2023, 7, 10),
        },
        CommunityDefinition {
            id: "def1-2".to_string(),
            definition: "It's the aura someone gives off that makes people attracted to them, doesn't even have to be romantic."
                .to_string(),
            example: "The way she commands the room? Pure rizz.".to_string(),
            tone: Tone::Sincere,
            tags: vec![DefinitionTag::Accurate, DefinitionTag::Funny],
            upvotes: 85,
            downvotes: 2,
            submitted_by: "AnotherUser".to_string(),
            created_at: date(2023, 7, 15),
        },
    ];

    let mut bussin = entry(
        "2",
        "Bussin'",
        "Used to describe something that is really good, especially food.",
        "This pizza is bussin' bussin'.",
        Tone::Sincere,
        &[Category::Food, Category::Social],
        Freshness::Established,
        Region::UsEast,
        date(2022, 2, 10),
        987,
        102,
    );
    bussin.origin = Some(
        "African American Vernacular English (AAVE), popularized on TikTok".to_string(),
    );

    let mid = entry(
        "3",
        "Mid",
        "Used to describe something as mediocre or average, often unimpressive.",
        "The movie was kinda mid, tbh.",
        Tone::Neutral,
        &[Category::Social, Category::Internet],
        Freshness::Established,
        Region::Global,
        date(2022, 9, 20),
        765,
        88,
    );

    let mut bet = entry(
        "4",
        "Bet",
        "An affirmation, agreement, or response meaning \"Okay,\" \"Alright,\" or \"For sure.\"",
        "Wanna grab food later? \"Bet.\"",
        Tone::Neutral,
        &[Category::Social],
        Freshness::Established,
        Region::Global,
        date(2021, 4, 5),
        1100,
        30,
    );
    bet.then_vs_now = Some(HistoricalMeaning {
        traditional_meaning: "A wager or agreement based on an uncertain outcome.".to_string(),
        current_meaning: "A simple affirmation or agreement.".to_string(),
    });

    let mut slay = entry(
        "5",
        "Slay",
        "To do something exceptionally well; to impress or succeed.",
        "She slayed that presentation!",
        Tone::Sincere,
        &[Category::Social, Category::Fashion, Category::Emotions],
        Freshness::Established,
        Region::Global,
        date(2020, 11, 15),
        1350,
        45,
    );
    slay.origin = Some(
        "Ballroom culture, popularized through RuPaul's Drag Race and general internet usage."
            .to_string(),
    );

    let mut npc = entry(
        "6",
        "NPC",
        "Non-Player Character; Used to describe someone who seems to lack independent thought or acts predictably, like a background character in a video game.",
        "He just stands there nodding, total NPC vibes.",
        Tone::Sarcastic,
        &[Category::Gaming, Category::Internet, Category::Social],
        Freshness::Fresh,
        Region::Global,
        date(2023, 9, 1),
        600,
        150,
    );
    npc.origin = Some("Video game terminology, adopted as internet slang.".to_string());

    let mut skibidi = entry(
        "7",
        "Skibidi",
        "Originating from a viral YouTube series featuring bizarre singing toilet characters. Often used nonsensically or to refer to the trend itself.",
        "What is this skibidi toilet thing everyone is talking about?",
        Tone::Playful,
        &[Category::Internet],
        Freshness::Fresh,
        Region::Global,
        date(2023, 10, 1),
        450,
        200,
    );
    skibidi.origin = Some("YouTube series \"Skibidi Toilet\" by DaFuq!?Boom!".to_string());

    let mut ate = entry(
        "10",
        "Ate",
        "Similar to \"slay,\" meaning someone did something extremely well or looked amazing.",
        "She absolutely ate that performance.",
        Tone::Sincere,
        &[Category::Social, Category::Fashion],
        Freshness::Fresh,
        Region::Global,
        date(2023, 12, 1),
        950,
        35,
    );
    ate.origin = Some("AAVE, popularized online.".to_string());

    vec![rizz, bussin, mid, bet, slay, npc, skibidi, ate]
}

/// The built-in battle pairs.
pub fn default_battles() -> Vec<BattlePair> {
    vec![BattlePair {
        id: "battle1".to_string(),
        question: "Which one's currently hitting harder?".to_string(),
        left: BattleTerm {
            id: "5".to_string(),
            term: "Slay".to_string(),
        },
        right: BattleTerm {
            id: "10".to_string(),
            term: "Ate".to_string(),
        },
    }]
}

fn trap(id: &str, term: &str, correct: &str, incorrect: &str, explanation: &str) -> BoomerTrap {
    BoomerTrap {
        id: id.to_string(),
        term: term.to_string(),
        correct_usage: correct.to_string(),
        incorrect_usage_example: incorrect.to_string(),
        explanation: explanation.to_string(),
    }
}

/// The built-in boomer traps.
pub fn default_traps() -> Vec<BoomerTrap> {
    vec![
        trap(
            "trap1",
            "Bet",
            "\"Wanna grab food later?\" \"Bet.\" (Meaning: Okay/Sure)",
            "\"I bet you can't finish that pizza!\" (Using the traditional meaning of wager)",
            "While \"bet\" still means wager, it is mostly used as a simple \"okay\" or agreement. Using it for an actual bet sounds a bit formal or dated in casual chat.",
        ),
        trap(
            "trap2",
            "Slay",
            "\"OMG, your outfit slays!\" (Meaning: Looks amazing/You did great)",
            "\"Did you slay the dragon in that game?\" (Using the literal meaning of kill)",
            "Unless you're actually talking medieval combat, \"slay\" means doing something exceptionally well or looking fantastic.",
        ),
        trap(
            "trap3",
            "Rizz",
            "\"He tried to rizz her up at the party.\" (Meaning: Charm or flirt with)",
            "\"My car has great rizz, it's very shiny.\" (Applying it to inanimate objects)",
            "\"Rizz\" (charisma) is applied to people and their ability to attract or charm others. Attributing it to objects misses the social nuance.",
        ),
        trap(
            "trap4",
            "Mid",
            "\"The movie was kinda mid.\" (Meaning: Mediocre/Unimpressive)",
            "\"I'll have the mid-size coffee.\" (Confusing it with \"medium\")",
            "\"Mid\" implies something is average at best, often with a note of disappointment. It's not just a synonym for \"medium\".",
        ),
    ]
}

/// The full built-in bundle.
pub fn default_bundle() -> SeedBundle {
    SeedBundle {
        entries: default_entries(),
        battles: default_battles(),
        traps: default_traps(),
    }
}

/// A store built from the built-in entries.
pub fn default_store() -> EntryStore {
    default_bundle().store()
}
