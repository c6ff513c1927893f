//! Vote coordinator.
//!
//! Applies a single +1 to an entry or one of its community definitions. It
//! never re-filters anything; callers re-derive their visible results from
//! the store afterwards.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::store::EntryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Upvote,
    Downvote,
}

/// What the vote lands on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", content = "definition_id", rename_all = "lowercase")]
pub enum VoteTarget {
    Term,
    Definition(String),
}

/// Result of a vote attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    Applied,
    /// Generated entries are immutable with respect to voting.
    RejectedAiGenerated,
    EntryNotFound,
    DefinitionNotFound,
}

impl VoteOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

fn bump(upvotes: &mut u64, downvotes: &mut u64, direction: VoteDirection) {
    match direction {
        VoteDirection::Upvote => *upvotes = upvotes.saturating_add(1),
        VoteDirection::Downvote => *downvotes = downvotes.saturating_add(1),
    }
}

/// Apply one vote to the store.
pub fn vote(
    store: &mut EntryStore,
    entry_id: &str,
    direction: VoteDirection,
    target: &VoteTarget,
) -> VoteOutcome {
    let Some(entry) = store.get_mut(entry_id) else {
        debug!(entry_id, "Vote target entry not found");
        return VoteOutcome::EntryNotFound;
    };

    if entry.is_ai_generated {
        info!(entry_id, "Rejected vote on generated entry");
        return VoteOutcome::RejectedAiGenerated;
    }

    match target {
        VoteTarget::Term => {
            bump(&mut entry.upvotes, &mut entry.downvotes, direction);
            debug!(
                entry_id,
                ?direction,
                upvotes = entry.upvotes,
                downvotes = entry.downvotes,
                "Vote applied"
            );
            VoteOutcome::Applied
        }
        VoteTarget::Definition(definition_id) => {
            let Some(def) = entry
                .community_definitions
                .iter_mut()
                .find(|d| &d.id == definition_id)
            else {
                debug!(
                    entry_id,
                    definition_id = %definition_id,
                    "Vote target definition not found"
                );
                return VoteOutcome::DefinitionNotFound;
            };
            bump(&mut def.upvotes, &mut def.downvotes, direction);
            debug!(entry_id, definition_id = %definition_id, ?direction, "Definition vote applied");
            VoteOutcome::Applied
        }
    }
}
