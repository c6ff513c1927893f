//! Lexicon - searchable informal-lexicon core
//!
//! In-memory dictionary of slang entries with:
//! - Region, term and category filtering
//! - Optimistic voting on entries and community definitions
//! - Fallback definition generation for unknown terms
//! - Concurrent "in the wild" mention lookups
//! - A per-session view controller with address synchronization
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            ViewController               │
//! │  (inputs, ViewState, notices, battle)   │
//! └───────┬──────────────┬──────────────┬───┘
//!         ▼              ▼              ▼
//! ┌─────────────┐ ┌─────────────┐ ┌─────────────┐
//! │ query       │ │ fallback    │ │ votes       │
//! │ (filter)    │ │ (generate)  │ │ (+1 deltas) │
//! └──────┬──────┘ └──────┬──────┘ └──────┬──────┘
//!        └───────────────┼───────────────┘
//!                        ▼
//!                 ┌─────────────┐
//!                 │ EntryStore  │
//!                 └─────────────┘
//! ```
//!
//! Collaborators (text generation, mention sources) are reached through the
//! traits in [`collaborators`]; `lexicon-agent` provides implementations.

pub mod address;
pub mod battle;
pub mod collaborators;
pub mod controller;
pub mod fallback;
pub mod mentions;
pub mod query;
pub mod seed;
pub mod store;
pub mod timeline;
pub mod translate;
pub mod traps;
pub mod trending;
pub mod types;
pub mod votes;

// Re-export main types for convenience
pub use address::QueryInputs;
pub use battle::{BattleError, BattlePair, BattleState};
pub use collaborators::{
    CollaboratorError, Collaborators, DefinitionGenerator, GeneratedDefinition, MentionSource,
    Translator,
};
pub use controller::{ListingView, Notice, SearchOutcome, SearchTicket, ViewController, ViewState};
pub use fallback::GenerationState;
pub use query::SearchQuery;
pub use seed::{SeedBundle, SeedError};
pub use store::{EntryStore, StoreError};
pub use translate::TranslateError;
pub use traps::BoomerTrap;
pub use types::*;
pub use votes::{VoteDirection, VoteOutcome, VoteTarget};
