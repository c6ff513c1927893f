//! Integration tests for a browsing session
//!
//! These drive a `ViewController` through the public API with in-process
//! collaborators, the way the gateway does: begin under the lock, run
//! outside it, settle.

use async_trait::async_trait;
use lexicon::controller::NoticeLevel;
use lexicon::{
    seed, Category, CollaboratorError, Collaborators, DefinitionGenerator, Freshness,
    GeneratedDefinition, Mention, MentionKind, MentionSource, QueryInputs, Region, Tone,
    ViewController, ViewState, VoteDirection, VoteOutcome, VoteTarget,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

struct CountingGenerator {
    calls: AtomicU32,
}

#[async_trait]
impl DefinitionGenerator for CountingGenerator {
    async fn define(&self, _term: &str) -> Result<GeneratedDefinition, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GeneratedDefinition {
            definition: "A hot dog, or something shaped like one.".to_string(),
            example: "He ate three glizzies at the game.".to_string(),
            tone: Tone::Playful,
            categories: vec![Category::Food, Category::Internet],
            freshness: Freshness::Fresh,
        })
    }
}

struct Source(MentionKind);

#[async_trait]
impl MentionSource for Source {
    fn kind(&self) -> MentionKind {
        self.0
    }

    async fn lookup(&self, term: &str) -> Result<Vec<Mention>, CollaboratorError> {
        Ok(vec![Mention {
            author: "@tester".to_string(),
            text: format!("{} in the wild", term),
            url: "https://example.test/post".to_string(),
            title: None,
        }])
    }
}

fn collaborators() -> (Collaborators, Arc<CountingGenerator>) {
    let generator = Arc::new(CountingGenerator {
        calls: AtomicU32::new(0),
    });
    let sources: Vec<Arc<dyn MentionSource>> = vec![
        Arc::new(Source(MentionKind::Tweet)),
        Arc::new(Source(MentionKind::ShortVideo)),
        Arc::new(Source(MentionKind::ForumPost)),
    ];
    (Collaborators::new(generator.clone(), sources), generator)
}

fn session(address: &str) -> ViewController {
    let bundle = seed::default_bundle();
    ViewController::new(bundle.store(), bundle.battles.clone())
        .with_inputs(QueryInputs::from_address(address))
}

/// First load from an address runs the search it describes.
#[tokio::test]
async fn test_first_load_from_address() {
    let (collab, _) = collaborators();
    let mut controller = session("?search=bussin&region=US-East");

    controller.refresh(&collab).await;
    let results = controller.state().results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].term, "Bussin'");
    assert_eq!(results[0].in_the_wild.as_ref().map(|w| w.total()), Some(3));
    assert_eq!(controller.address(), "search=bussin&region=US-East");
}

/// Lock is only held for the synchronous phases.
#[tokio::test]
async fn test_two_phase_search_behind_mutex() {
    let (collab, generator) = collaborators();
    let shared = Arc::new(Mutex::new(session("")));

    let ticket = shared.lock().await.submit_term("glizzy");
    let outcome = ticket.run(&collab).await;
    assert!(shared.lock().await.settle(outcome));

    let controller = shared.lock().await;
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    assert!(controller.state().results()[0].is_ai_generated);
    assert_eq!(controller.state().results()[0].region, Region::Unknown);
}

/// Vote, re-filter, and the AI rejection path in one session.
#[tokio::test]
async fn test_vote_flow() {
    let (collab, _) = collaborators();
    let mut controller = session("?search=mid");
    controller.refresh(&collab).await;

    let receipt = controller.vote("3", VoteDirection::Upvote, VoteTarget::Term);
    let ticket = receipt.ticket.expect("applied vote re-filters");
    let outcome = ticket.run(&collab).await;
    controller.settle(outcome);
    assert_eq!(controller.state().results()[0].upvotes, 766);

    let ticket = controller.submit_term("glizzy");
    let outcome = ticket.run(&collab).await;
    controller.settle(outcome);
    controller.drain_notices();

    let generated_id = controller.state().results()[0].id.clone();
    let receipt = controller.vote(
        &generated_id,
        VoteDirection::Downvote,
        VoteTarget::Definition("def1-1".to_string()),
    );
    assert_eq!(receipt.outcome, VoteOutcome::RejectedAiGenerated);
    let notices = controller.drain_notices();
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(
        notices[0].message,
        "Can't vote on definitions of AI-generated entries."
    );
}

/// Category toggles and region changes do not trigger generation.
#[tokio::test]
async fn test_filters_never_generate() {
    let (collab, generator) = collaborators();
    let mut controller = session("?search=glizzy&category=food");
    controller.refresh(&collab).await;
    assert_eq!(controller.state(), &ViewState::ShowingEmpty);

    // Superseded before it runs.
    let _ = controller.toggle_category(Category::Food);
    let ticket = controller.set_region(Region::Au);
    let outcome = ticket.run(&collab).await;
    controller.settle(outcome);

    assert_eq!(controller.state(), &ViewState::ShowingEmpty);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

/// Sessions built from the same seed do not share votes.
#[test]
fn test_sessions_are_isolated() {
    let mut a = session("");
    let b = session("");
    a.vote("1", VoteDirection::Upvote, VoteTarget::Term);
    assert_eq!(a.store().get("1").map(|e| e.upvotes), Some(1503));
    assert_eq!(b.store().get("1").map(|e| e.upvotes), Some(1502));
}
