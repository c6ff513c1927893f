//! View controller for the main listing.
//!
//! Owns the interactive state of one browsing session and sequences the
//! query engine, the fallback orchestrator, mention fan-out and votes.
//!
//! Searches are split in two so an owner behind a lock can release it while
//! collaborators are awaited:
//!
//! 1. [`ViewController::begin_search`] filters the store synchronously and
//!    returns a [`SearchTicket`] stamped with a new sequence number.
//! 2. [`SearchTicket::run`] performs mention lookups or fallback generation.
//! 3. [`ViewController::settle`] applies the outcome, unless a newer search
//!    has started since, in which case the outcome is discarded.

use serde::Serialize;
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::address::QueryInputs;
use crate::battle::{BattleBoard, BattleError, BattlePair, BattleState};
use crate::collaborators::Collaborators;
use crate::fallback::{self, FallbackResolution, GenerationState};
use crate::mentions;
use crate::query::{self, SearchQuery};
use crate::store::EntryStore;
use crate::timeline::{self, TimelineYear};
use crate::trending::{self, TrendingTerm};
use crate::types::{Category, Entry, Region};
use crate::votes::{self, VoteDirection, VoteOutcome, VoteTarget};

/// Overall deadline for one search, collaborators included.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

const SEARCH_FAILED: &str = "Failed to load entries. Please try again.";

/// What the listing shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ViewState {
    Idle,
    Searching,
    Generating,
    ShowingResults(Vec<Entry>),
    ShowingEmpty,
    ShowingError(String),
}

impl ViewState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Searching | Self::Generating)
    }

    pub fn results(&self) -> &[Entry] {
        match self {
            Self::ShowingResults(results) => results,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.to_string(),
            message: message.into(),
        }
    }

    fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// Collaborator work a search still needs after filtering.
#[derive(Debug, Clone)]
enum Plan {
    Done,
    Mentions { term: String },
    Generate,
}

/// A search that has been filtered but not yet settled.
#[derive(Debug, Clone)]
pub struct SearchTicket {
    seq: u64,
    query: SearchQuery,
    results: Vec<Entry>,
    plan: Plan,
    timeout: Duration,
}

/// The result of running a [`SearchTicket`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    seq: u64,
    result: Result<FallbackResolution, String>,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Whether running this ticket needs any collaborator.
    pub fn needs_collaborators(&self) -> bool {
        !matches!(self.plan, Plan::Done)
    }

    /// Perform the collaborator work.
    ///
    /// Generation runs under the search deadline and missing it fails the
    /// search. Mention lookups get the same deadline per source, and a source
    /// that misses it only empties its own list.
    pub async fn run(self, collaborators: &Collaborators) -> SearchOutcome {
        let Self {
            seq,
            query,
            mut results,
            plan,
            timeout,
        } = self;

        let result = match plan {
            Plan::Done => Ok(FallbackResolution {
                results,
                state: GenerationState::NotAttempted,
            }),
            Plan::Mentions { term } => {
                let wild = mentions::gather(&collaborators.mention_sources, &term, timeout).await;
                if let Some(entry) = results.first_mut() {
                    entry.in_the_wild = Some(wild);
                }
                Ok(FallbackResolution {
                    results,
                    state: GenerationState::NotAttempted,
                })
            }
            Plan::Generate => {
                let generation =
                    fallback::resolve(collaborators.generator.as_ref(), &query, results);
                tokio::time::timeout(timeout, generation).await.map_err(|_| {
                    warn!(
                        seq,
                        timeout_ms = timeout.as_millis() as u64,
                        "Search deadline exceeded"
                    );
                    SEARCH_FAILED.to_string()
                })
            }
        };
        SearchOutcome { seq, result }
    }
}

/// Outcome of a vote plus the re-filter that reflects it.
#[derive(Debug)]
pub struct VoteReceipt {
    pub outcome: VoteOutcome,
    /// Present when the store changed.
    pub ticket: Option<SearchTicket>,
}

/// An entry as displayed, with its detail panels gated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryView {
    #[serde(flatten)]
    pub entry: Entry,
    pub detail_visible: bool,
    pub freshness_meter: u8,
    pub freshness_label: &'static str,
}

impl EntryView {
    /// Community definitions and mentions are only kept when the entry is the
    /// single human-written result whose headword equals the searched term.
    pub fn build(entry: &Entry, results: &[Entry], term: &str) -> Self {
        let detail_visible = query::detail_visible(entry, results, term);
        let mut entry = entry.clone();
        if !detail_visible {
            entry.community_definitions.clear();
            entry.in_the_wild = None;
        }
        Self {
            detail_visible,
            freshness_meter: entry.freshness.meter_value(),
            freshness_label: entry.freshness.label(),
            entry,
        }
    }
}

/// Serializable snapshot of a session.
#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub state: ViewState,
    pub inputs: QueryInputs,
    pub address: String,
    pub entries: Vec<EntryView>,
    pub generation: GenerationState,
    pub battle: BattleState,
}

pub struct ViewController {
    store: EntryStore,
    inputs: QueryInputs,
    state: ViewState,
    generation: GenerationState,
    seq: u64,
    notices: Vec<Notice>,
    battles: BattleBoard,
    search_timeout: Duration,
}

impl ViewController {
    pub fn new(store: EntryStore, battles: Vec<BattlePair>) -> Self {
        Self {
            store,
            inputs: QueryInputs::default(),
            state: ViewState::Idle,
            generation: GenerationState::NotAttempted,
            seq: 0,
            notices: Vec::new(),
            battles: BattleBoard::new(battles),
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }

    /// Start from inputs parsed from an address on first load.
    pub fn with_inputs(mut self, inputs: QueryInputs) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn inputs(&self) -> &QueryInputs {
        &self.inputs
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn generation(&self) -> &GenerationState {
        &self.generation
    }

    /// Current address; rendering it never triggers a search.
    pub fn address(&self) -> String {
        self.inputs.to_address()
    }

    /// Filter synchronously and return the collaborator work still pending.
    pub fn begin_search(&mut self) -> SearchTicket {
        self.seq += 1;
        let query = self.inputs.query();
        let results = query::search(self.store.entries(), &query);

        let plan = if query::wants_mentions(&results, &query) {
            Plan::Mentions {
                term: results[0].term.clone(),
            }
        } else if fallback::is_eligible(&query, &results) {
            Plan::Generate
        } else {
            Plan::Done
        };

        self.state = match plan {
            Plan::Generate => ViewState::Generating,
            _ => ViewState::Searching,
        };
        debug!(seq = self.seq, matched = results.len(), plan = ?plan, "Search started");

        SearchTicket {
            seq: self.seq,
            query,
            results,
            plan,
            timeout: self.search_timeout,
        }
    }

    /// Apply a search outcome. Returns false when it was stale and dropped.
    pub fn settle(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.seq != self.seq {
            debug!(stale = outcome.seq, latest = self.seq, "Discarding stale search result");
            return false;
        }

        match outcome.result {
            Ok(FallbackResolution { results, state }) => {
                match &state {
                    GenerationState::Generated => self.notices.push(Notice::info(
                        "AI Definition",
                        format!(
                            "No entry found for \"{}\", so one was generated.",
                            self.inputs.term.trim()
                        ),
                    )),
                    GenerationState::Failed(_) => self.notices.push(Notice::error(
                        "Generation Failed",
                        format!(
                            "Couldn't generate a definition for \"{}\".",
                            self.inputs.term.trim()
                        ),
                    )),
                    GenerationState::NotAttempted => {}
                }
                self.generation = state;
                self.state = if results.is_empty() {
                    ViewState::ShowingEmpty
                } else {
                    ViewState::ShowingResults(results)
                };
            }
            Err(message) => {
                self.generation = GenerationState::NotAttempted;
                self.state = ViewState::ShowingError(message);
            }
        }
        true
    }

    /// Run a full search with this controller held for the duration.
    pub async fn refresh(&mut self, collaborators: &Collaborators) -> &ViewState {
        let ticket = self.begin_search();
        let outcome = ticket.run(collaborators).await;
        self.settle(outcome);
        &self.state
    }

    /// Re-issue the current inputs, typically after `ShowingError`.
    pub fn retry(&mut self) -> SearchTicket {
        info!(address = %self.address(), "Retrying search");
        self.begin_search()
    }

    pub fn submit_term(&mut self, term: impl Into<String>) -> SearchTicket {
        self.inputs.term = term.into();
        self.begin_search()
    }

    pub fn toggle_category(&mut self, category: Category) -> SearchTicket {
        self.inputs.toggle_category(category);
        self.begin_search()
    }

    pub fn set_region(&mut self, region: Region) -> SearchTicket {
        self.inputs.region = region;
        self.begin_search()
    }

    /// Apply a vote, then return a re-filter when the store changed.
    ///
    /// Generated entries only live in the displayed results, so they are
    /// checked there before the store is consulted.
    pub fn vote(
        &mut self,
        entry_id: &str,
        direction: VoteDirection,
        target: VoteTarget,
    ) -> VoteReceipt {
        let displayed_generated = self
            .state
            .results()
            .iter()
            .any(|e| e.id == entry_id && e.is_ai_generated);

        let outcome = if displayed_generated {
            VoteOutcome::RejectedAiGenerated
        } else {
            votes::vote(&mut self.store, entry_id, direction, &target)
        };

        match outcome {
            VoteOutcome::Applied => VoteReceipt {
                outcome,
                ticket: Some(self.begin_search()),
            },
            VoteOutcome::RejectedAiGenerated => {
                let message = match target {
                    VoteTarget::Term => "Can't vote on AI-generated entries.",
                    VoteTarget::Definition(_) => {
                        "Can't vote on definitions of AI-generated entries."
                    }
                };
                info!(entry_id, "Vote on generated entry rejected");
                self.notices.push(Notice::error("Voting Disabled", message));
                VoteReceipt {
                    outcome,
                    ticket: None,
                }
            }
            VoteOutcome::EntryNotFound | VoteOutcome::DefinitionNotFound => VoteReceipt {
                outcome,
                ticket: None,
            },
        }
    }

    /// Take all pending notices.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn pending_notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn load_battle(&mut self) {
        self.battles.load();
    }

    pub fn battle(&self) -> BattleState {
        self.battles.state()
    }

    /// Record a battle vote and announce the winner.
    pub fn vote_battle(&mut self, battle_id: &str, term_id: &str) -> Result<(), BattleError> {
        let winner = self.battles.vote(battle_id, term_id)?;
        self.notices.push(Notice::info(
            "Vote Recorded!",
            format!("You voted for \"{}\".", winner),
        ));
        Ok(())
    }

    pub fn trending(&self, limit: usize) -> Vec<TrendingTerm> {
        trending::trending(self.store.entries(), limit)
    }

    pub fn timeline(&self, years: RangeInclusive<i32>) -> Vec<TimelineYear> {
        timeline::timeline(self.store.entries(), years)
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> ListingView {
        let results = self.state.results();
        ListingView {
            state: self.state.clone(),
            inputs: self.inputs.clone(),
            address: self.address(),
            entries: results
                .iter()
                .map(|e| EntryView::build(e, results, &self.inputs.term))
                .collect(),
            generation: self.generation.clone(),
            battle: self.battles.state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{
        CollaboratorError, DefinitionGenerator, GeneratedDefinition, MentionSource,
    };
    use crate::fallback::fakes::ScriptedGenerator;
    use crate::mentions::fakes::FixedSource;
    use crate::seed;
    use crate::types::MentionKind;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn controller() -> ViewController {
        let bundle = seed::default_bundle();
        ViewController::new(bundle.store(), bundle.battles.clone())
    }

    fn collaborators(generator: Arc<ScriptedGenerator>) -> (Collaborators, Vec<Arc<FixedSource>>) {
        let sources = vec![
            FixedSource::ok(MentionKind::Tweet),
            FixedSource::ok(MentionKind::ShortVideo),
            FixedSource::failing(MentionKind::ForumPost),
        ];
        let dyn_sources: Vec<Arc<dyn MentionSource>> = sources
            .iter()
            .map(|s| Arc::clone(s) as Arc<dyn MentionSource>)
            .collect();
        (Collaborators::new(generator, dyn_sources), sources)
    }

    #[tokio::test]
    async fn test_initial_browse_shows_global_pool() {
        let mut controller = controller();
        assert_eq!(controller.state(), &ViewState::Idle);
        let (collab, sources) = collaborators(Arc::new(ScriptedGenerator::ok()));

        controller.refresh(&collab).await;
        // Everything but the US-East entry.
        assert_eq!(controller.state().results().len(), 7);
        assert!(sources.iter().all(|s| s.calls.load(Ordering::SeqCst) == 0));
    }

    #[tokio::test]
    async fn test_single_hit_attaches_mentions() {
        let mut controller = controller();
        let (collab, _) = collaborators(Arc::new(ScriptedGenerator::ok()));

        let ticket = controller.submit_term("rizz");
        assert_eq!(controller.state(), &ViewState::Searching);
        assert!(ticket.needs_collaborators());
        let outcome = ticket.run(&collab).await;
        assert!(controller.settle(outcome));

        let results = controller.state().results();
        assert_eq!(results.len(), 1);
        let wild = results[0].in_the_wild.as_ref().unwrap();
        assert_eq!(wild.tweets.len(), 1);
        assert_eq!(wild.short_videos.len(), 1);
        assert!(wild.forum_posts.is_empty());
        // Mention failure does not move the listing to an error.
        assert!(matches!(controller.state(), ViewState::ShowingResults(_)));
    }

    #[tokio::test]
    async fn test_multi_hit_strips_mentions() {
        let mut controller = controller();
        let (collab, sources) = collaborators(Arc::new(ScriptedGenerator::ok()));

        let ticket = controller.toggle_category(Category::Social);
        assert!(!ticket.needs_collaborators());
        controller.settle(ticket.run(&collab).await);

        let results = controller.state().results();
        assert!(results.len() > 1);
        assert!(results.iter().all(|e| e.in_the_wild.is_none()));
        assert!(sources.iter().all(|s| s.calls.load(Ordering::SeqCst) == 0));
    }

    #[tokio::test]
    async fn test_unknown_term_generates_once() {
        let mut controller = controller();
        let generator = Arc::new(ScriptedGenerator::ok());
        let (collab, _) = collaborators(Arc::clone(&generator));

        let ticket = controller.submit_term("glizzy");
        assert_eq!(controller.state(), &ViewState::Generating);
        controller.settle(ticket.run(&collab).await);

        assert_eq!(generator.call_count(), 1);
        assert_eq!(controller.generation(), &GenerationState::Generated);
        let results = controller.state().results();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_ai_generated);
        assert!(controller.store().find_by_term("glizzy").is_none());
        assert_eq!(controller.drain_notices().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_term_in_region_stays_empty() {
        let mut controller = controller();
        let generator = Arc::new(ScriptedGenerator::ok());
        let (collab, _) = collaborators(Arc::clone(&generator));

        controller.set_region(Region::Uk);
        let ticket = controller.submit_term("glizzy");
        controller.settle(ticket.run(&collab).await);

        assert_eq!(generator.call_count(), 0);
        assert_eq!(controller.state(), &ViewState::ShowingEmpty);
    }

    #[tokio::test]
    async fn test_failed_generation_shows_empty_with_notice() {
        let mut controller = controller();
        let (collab, _) = collaborators(Arc::new(ScriptedGenerator::failing()));

        let ticket = controller.submit_term("glizzy");
        controller.settle(ticket.run(&collab).await);

        assert_eq!(controller.state(), &ViewState::ShowingEmpty);
        let notices = controller.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(controller.drain_notices().is_empty());
    }

    #[tokio::test]
    async fn test_stale_outcome_is_discarded() {
        let mut controller = controller();
        let (collab, _) = collaborators(Arc::new(ScriptedGenerator::ok()));

        let first = controller.submit_term("rizz");
        let second = controller.submit_term("mid");
        let stale = first.run(&collab).await;
        let fresh = second.run(&collab).await;

        assert!(controller.settle(fresh));
        assert!(!controller.settle(stale));
        assert_eq!(controller.state().results()[0].term, "Mid");
    }

    #[tokio::test]
    async fn test_vote_then_refilter_reflects_mutation() {
        let mut controller = controller();
        let (collab, _) = collaborators(Arc::new(ScriptedGenerator::ok()));
        let ticket = controller.submit_term("mid");
        controller.settle(ticket.run(&collab).await);

        let receipt = controller.vote("3", VoteDirection::Upvote, VoteTarget::Term);
        assert!(receipt.outcome.is_applied());
        let ticket = receipt.ticket.unwrap();
        controller.settle(ticket.run(&collab).await);

        let mid = &controller.state().results()[0];
        assert_eq!((mid.upvotes, mid.downvotes), (766, 88));
    }

    #[tokio::test]
    async fn test_vote_on_displayed_generated_entry_rejected() {
        let mut controller = controller();
        let (collab, _) = collaborators(Arc::new(ScriptedGenerator::ok()));
        let ticket = controller.submit_term("glizzy");
        controller.settle(ticket.run(&collab).await);
        controller.drain_notices();

        let id = controller.state().results()[0].id.clone();
        for _ in 0..2 {
            let receipt = controller.vote(&id, VoteDirection::Upvote, VoteTarget::Term);
            assert_eq!(receipt.outcome, VoteOutcome::RejectedAiGenerated);
            assert!(receipt.ticket.is_none());
        }
        let notices = controller.drain_notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].title, "Voting Disabled");
        assert_eq!(controller.state().results()[0].upvotes, 0);
    }

    #[tokio::test]
    async fn test_deadline_moves_to_error_and_retry_recovers() {
        let mut controller = controller().with_search_timeout(Duration::from_millis(20));
        let collab = Collaborators::new(Arc::new(SlowGenerator), Vec::new());

        let ticket = controller.submit_term("glizzy");
        controller.settle(ticket.run(&collab).await);
        assert!(matches!(controller.state(), ViewState::ShowingError(_)));
        assert_eq!(controller.inputs().term, "glizzy");

        let (fast, _) = collaborators(Arc::new(ScriptedGenerator::ok()));
        let ticket = controller.retry();
        controller.settle(ticket.run(&fast).await);
        assert_eq!(controller.state().results().len(), 1);
    }

    #[tokio::test]
    async fn test_slow_mention_source_keeps_results() {
        let mut controller = controller().with_search_timeout(Duration::from_millis(50));
        let sources: Vec<Arc<dyn MentionSource>> = vec![
            FixedSource::ok(MentionKind::Tweet),
            FixedSource::ok(MentionKind::ShortVideo),
            FixedSource::slow(MentionKind::ForumPost, Duration::from_secs(5)),
        ];
        let collab = Collaborators::new(Arc::new(ScriptedGenerator::ok()), sources);

        let ticket = controller.submit_term("rizz");
        assert!(controller.settle(ticket.run(&collab).await));

        assert!(matches!(controller.state(), ViewState::ShowingResults(_)));
        let results = controller.state().results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].term, "Rizz");
        let wild = results[0].in_the_wild.as_ref().unwrap();
        assert_eq!(wild.tweets.len(), 1);
        assert_eq!(wild.short_videos.len(), 1);
        assert!(wild.forum_posts.is_empty());
    }

    struct SlowGenerator;

    #[async_trait::async_trait]
    impl DefinitionGenerator for SlowGenerator {
        async fn define(&self, _term: &str) -> Result<GeneratedDefinition, CollaboratorError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Err(CollaboratorError::Empty)
        }
    }

    #[tokio::test]
    async fn test_view_gates_detail_and_renders_address() {
        let mut controller = controller();
        let (collab, _) = collaborators(Arc::new(ScriptedGenerator::ok()));
        controller.set_region(Region::UsEast);
        let ticket = controller.submit_term("rizz");
        controller.settle(ticket.run(&collab).await);

        let view = controller.view();
        assert_eq!(view.address, "search=rizz&region=US-East");
        assert!(view.entries[0].detail_visible);
        assert_eq!(view.entries[0].entry.community_definitions.len(), 2);

        let ticket = controller.submit_term("riz");
        controller.settle(ticket.run(&collab).await);
        let view = controller.view();
        assert!(!view.entries[0].detail_visible);
        assert!(view.entries[0].entry.community_definitions.is_empty());
    }

    #[test]
    fn test_battle_vote_pushes_notice() {
        let mut controller = controller();
        assert_eq!(controller.battle(), BattleState::Loading);
        controller.load_battle();
        controller.vote_battle("battle1", "5").unwrap();
        assert_eq!(
            controller.vote_battle("battle1", "10"),
            Err(BattleError::AlreadyVoted("battle1".to_string()))
        );
        let notices = controller.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "You voted for \"Slay\".");
        assert_eq!(controller.state(), &ViewState::Idle);
    }
}
