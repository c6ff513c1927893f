//! Two-choice "battle" widget.
//!
//! Each session keeps its own tallies. A session may vote once per battle,
//! and the battle widget fails in its own scope without touching the main
//! listing state.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// One side of a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleTerm {
    /// Entry id of the term.
    pub id: String,
    pub term: String,
}

/// A head-to-head question between two terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattlePair {
    pub id: String,
    pub question: String,
    pub left: BattleTerm,
    pub right: BattleTerm,
}

impl BattlePair {
    /// The side with `term_id`, if any.
    pub fn side(&self, term_id: &str) -> Option<&BattleTerm> {
        [&self.left, &self.right]
            .into_iter()
            .find(|t| t.id == term_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("already voted in battle {0}")]
    AlreadyVoted(String),

    #[error("term {term_id} is not part of battle {battle_id}")]
    UnknownTerm { battle_id: String, term_id: String },

    #[error("no such battle: {0}")]
    UnknownBattle(String),
}

/// Vote counts for a battle within one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleTally {
    pub left: u64,
    pub right: u64,
}

/// What the widget currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BattleState {
    Loading,
    Ready {
        battle: BattlePair,
        tally: BattleTally,
        /// Term id this session voted for, once it has voted.
        #[serde(skip_serializing_if = "Option::is_none")]
        voted_for: Option<String>,
    },
    Unavailable {
        reason: String,
    },
}

/// Per-session battle bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct BattleBoard {
    pairs: Vec<BattlePair>,
    loaded: bool,
    tallies: HashMap<String, BattleTally>,
    votes: HashMap<String, String>,
}

impl BattleBoard {
    pub fn new(pairs: Vec<BattlePair>) -> Self {
        Self {
            pairs,
            ..Self::default()
        }
    }

    /// Mark the board as loaded. Until then the widget shows `Loading`.
    pub fn load(&mut self) {
        self.loaded = true;
        debug!(battles = self.pairs.len(), "Battle board loaded");
    }

    /// The battle currently offered: the first one this session has not
    /// voted in, or the last one voted in when all are done.
    pub fn current(&self) -> Option<&BattlePair> {
        self.pairs
            .iter()
            .find(|p| !self.votes.contains_key(&p.id))
            .or_else(|| self.pairs.last())
    }

    pub fn state(&self) -> BattleState {
        if !self.loaded {
            return BattleState::Loading;
        }
        match self.current() {
            Some(battle) => BattleState::Ready {
                tally: self.tallies.get(&battle.id).cloned().unwrap_or_default(),
                voted_for: self.votes.get(&battle.id).cloned(),
                battle: battle.clone(),
            },
            None => BattleState::Unavailable {
                reason: "No battle available right now.".to_string(),
            },
        }
    }

    /// Record this session's vote and return the winning term's headword.
    pub fn vote(&mut self, battle_id: &str, term_id: &str) -> Result<String, BattleError> {
        let pair = self
            .pairs
            .iter()
            .find(|p| p.id == battle_id)
            .ok_or_else(|| BattleError::UnknownBattle(battle_id.to_string()))?;

        if self.votes.contains_key(battle_id) {
            return Err(BattleError::AlreadyVoted(battle_id.to_string()));
        }

        let winner = pair.side(term_id).ok_or_else(|| BattleError::UnknownTerm {
            battle_id: battle_id.to_string(),
            term_id: term_id.to_string(),
        })?;
        let winner_term = winner.term.clone();
        let is_left = pair.left.id == term_id;

        let tally = self.tallies.entry(battle_id.to_string()).or_default();
        if is_left {
            tally.left += 1;
        } else {
            tally.right += 1;
        }
        self.votes
            .insert(battle_id.to_string(), term_id.to_string());

        info!(battle_id, term_id, winner = %winner_term, "Battle vote recorded");
        Ok(winner_term)
    }

    /// Battle ids this session has voted in.
    pub fn voted(&self) -> HashSet<&str> {
        self.votes.keys().map(String::as_str).collect()
    }
}
