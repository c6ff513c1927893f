//! Session endpoints
//!
//! Searches run in two phases so a slow collaborator never holds the
//! session lock: the ticket is taken under the lock, run without it, and
//! the outcome settled under the lock again. A newer search taken in the
//! meantime makes the older outcome stale, and `settle` drops it.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use lexicon::controller::VoteReceipt;
use lexicon::timeline::{TimelineYear, DEFAULT_YEARS, MAX_SPAN_YEARS};
use lexicon::trending::{TrendingTerm, DEFAULT_LIMIT};
use lexicon::{
    BattleState, Category, ListingView, Notice, QueryInputs, Region, SearchTicket, VoteDirection,
    VoteOutcome, VoteTarget,
};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::{debug, info};
use url::form_urlencoded;

use super::api::{json_response, parse_body};
use crate::server::AppState;
use crate::sessions::SessionHandle;
use crate::types::{GatewayError, Result};

type Reply = Result<Response<Full<Bytes>>>;

/// Upper bound for `?limit=` on the trending endpoint.
pub const MAX_TRENDING_LIMIT: usize = 50;

/// A session's listing plus the notices raised since the last response.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub view: ListingView,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub outcome: VoteOutcome,
    #[serde(flatten)]
    pub session: SessionResponse,
}

#[derive(Debug, Serialize)]
pub struct BattleResponse {
    pub battle: BattleState,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub trending: Vec<TrendingTerm>,
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub years: Vec<TimelineYear>,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    term: String,
}

#[derive(Debug, Deserialize)]
struct RegionBody {
    region: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum VoteKind {
    Term,
    Definition,
}

#[derive(Debug, Deserialize)]
struct VoteBody {
    entry_id: String,
    direction: VoteDirection,
    /// Inferred from `definition_id` when absent.
    #[serde(default)]
    target: Option<VoteKind>,
    #[serde(default)]
    definition_id: Option<String>,
}

impl VoteBody {
    fn target(&self) -> Result<VoteTarget> {
        match (self.target, &self.definition_id) {
            (None | Some(VoteKind::Definition), Some(id)) => Ok(VoteTarget::Definition(id.clone())),
            (None | Some(VoteKind::Term), None) => Ok(VoteTarget::Term),
            (Some(VoteKind::Definition), None) => Err(GatewayError::BadRequest(
                "definition votes need a definition_id".to_string(),
            )),
            (Some(VoteKind::Term), Some(_)) => Err(GatewayError::BadRequest(
                "term votes take no definition_id".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BattleVoteBody {
    battle_id: String,
    term_id: String,
}

/// Run a ticket outside the lock and settle it.
async fn drive(state: &AppState, handle: &SessionHandle, ticket: SearchTicket) {
    let seq = ticket.seq();
    if ticket.needs_collaborators() {
        debug!(seq, "Search needs collaborators");
    }
    let outcome = ticket.run(&state.collaborators).await;
    if !handle.lock().await.settle(outcome) {
        debug!(seq, "Discarded stale search outcome");
    }
}

async fn snapshot(session_id: &str, handle: &SessionHandle) -> SessionResponse {
    let mut controller = handle.lock().await;
    SessionResponse {
        session_id: session_id.to_string(),
        view: controller.view(),
        notices: controller.drain_notices(),
    }
}

async fn respond(status: StatusCode, session_id: &str, handle: &SessionHandle) -> Reply {
    json_response(status, &snapshot(session_id, handle).await)
}

/// Open a session from a first-load address and run its initial search.
pub async fn create(state: &AppState, query: &str) -> Reply {
    let inputs = QueryInputs::from_address(query);
    let (id, handle) = state.sessions.create(inputs)?;

    let ticket = handle.lock().await.begin_search();
    drive(state, &handle, ticket).await;

    respond(StatusCode::CREATED, &id.to_string(), &handle).await
}

pub async fn show(state: &AppState, session_id: &str) -> Reply {
    let handle = state.sessions.get(session_id)?;
    respond(StatusCode::OK, session_id, &handle).await
}

pub async fn search(state: &AppState, session_id: &str, body: &[u8]) -> Reply {
    let handle = state.sessions.get(session_id)?;
    let body: SearchBody = parse_body(body)?;

    let ticket = handle.lock().await.submit_term(body.term);
    drive(state, &handle, ticket).await;

    respond(StatusCode::OK, session_id, &handle).await
}

pub async fn toggle_category(
    state: &AppState,
    session_id: &str,
    category: &str,
) -> Reply {
    let handle = state.sessions.get(session_id)?;
    let category: Category = category.parse()?;

    let ticket = handle.lock().await.toggle_category(category);
    drive(state, &handle, ticket).await;

    respond(StatusCode::OK, session_id, &handle).await
}

pub async fn set_region(state: &AppState, session_id: &str, body: &[u8]) -> Reply {
    let handle = state.sessions.get(session_id)?;
    let body: RegionBody = parse_body(body)?;
    let region: Region = body.region.parse()?;
    if region == Region::Unknown {
        return Err(GatewayError::BadRequest(
            "region Unknown cannot be selected".to_string(),
        ));
    }

    let ticket = handle.lock().await.set_region(region);
    drive(state, &handle, ticket).await;

    respond(StatusCode::OK, session_id, &handle).await
}

pub async fn retry(state: &AppState, session_id: &str) -> Reply {
    let handle = state.sessions.get(session_id)?;

    let ticket = handle.lock().await.retry();
    drive(state, &handle, ticket).await;

    respond(StatusCode::OK, session_id, &handle).await
}

pub async fn vote(state: &AppState, session_id: &str, body: &[u8]) -> Reply {
    let handle = state.sessions.get(session_id)?;
    let body: VoteBody = parse_body(body)?;
    let target = body.target()?;

    let VoteReceipt { outcome, ticket } =
        handle.lock().await.vote(&body.entry_id, body.direction, target);

    match &outcome {
        VoteOutcome::EntryNotFound => {
            return Err(GatewayError::NotFound(format!("entry {}", body.entry_id)));
        }
        VoteOutcome::DefinitionNotFound => {
            return Err(GatewayError::NotFound(format!(
                "definition on entry {}",
                body.entry_id
            )));
        }
        VoteOutcome::Applied | VoteOutcome::RejectedAiGenerated => {}
    }

    if let Some(ticket) = ticket {
        drive(state, &handle, ticket).await;
    }
    info!(session_id, entry_id = %body.entry_id, ?outcome, "Vote handled");

    json_response(
        StatusCode::OK,
        &VoteResponse {
            outcome,
            session: snapshot(session_id, &handle).await,
        },
    )
}

pub async fn battle(state: &AppState, session_id: &str) -> Reply {
    let handle = state.sessions.get(session_id)?;
    let mut controller = handle.lock().await;
    json_response(
        StatusCode::OK,
        &BattleResponse {
            battle: controller.battle(),
            notices: controller.drain_notices(),
        },
    )
}

pub async fn vote_battle(state: &AppState, session_id: &str, body: &[u8]) -> Reply {
    let handle = state.sessions.get(session_id)?;
    let body: BattleVoteBody = parse_body(body)?;

    let mut controller = handle.lock().await;
    controller.vote_battle(&body.battle_id, &body.term_id)?;

    json_response(
        StatusCode::OK,
        &BattleResponse {
            battle: controller.battle(),
            notices: controller.drain_notices(),
        },
    )
}

pub async fn trending(state: &AppState, session_id: &str, query: &str) -> Reply {
    let handle = state.sessions.get(session_id)?;
    let limit = match query_param(query, "limit") {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| GatewayError::BadRequest(format!("invalid limit: {}", raw)))?
            .min(MAX_TRENDING_LIMIT),
        None => DEFAULT_LIMIT,
    };

    let trending = handle.lock().await.trending(limit);
    json_response(StatusCode::OK, &TrendingResponse { trending })
}

pub async fn timeline(state: &AppState, session_id: &str, query: &str) -> Reply {
    let handle = state.sessions.get(session_id)?;
    let range = year_range(query)?;

    let years = handle.lock().await.timeline(range);
    json_response(StatusCode::OK, &TimelineResponse { years })
}

pub(crate) fn query_param(query: &str, name: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// `?from=`/`?to=`, defaulting to the archive's usual years.
fn year_range(query: &str) -> Result<RangeInclusive<i32>> {
    let from = year_param(query, "from")?.unwrap_or(*DEFAULT_YEARS.start());
    let to = year_param(query, "to")?.unwrap_or(*DEFAULT_YEARS.end());
    if from > to {
        return Err(GatewayError::BadRequest(format!(
            "from ({}) is after to ({})",
            from, to
        )));
    }
    if i64::from(to) - i64::from(from) >= MAX_SPAN_YEARS {
        return Err(GatewayError::BadRequest(format!(
            "timeline spans at most {} years",
            MAX_SPAN_YEARS
        )));
    }
    Ok(from..=to)
}

fn year_param(query: &str, name: &str) -> Result<Option<i32>> {
    query_param(query, name)
        .map(|raw| {
            raw.parse::<i32>()
                .map_err(|_| GatewayError::BadRequest(format!("invalid {}: {}", name, raw)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param() {
        assert_eq!(query_param("limit=3&x=1", "limit").as_deref(), Some("3"));
        assert_eq!(query_param("term=no%20cap", "term").as_deref(), Some("no cap"));
        assert_eq!(query_param("", "limit"), None);
    }

    #[test]
    fn test_vote_body_target() {
        let body: VoteBody =
            serde_json::from_str(r#"{"entry_id":"1","direction":"upvote"}"#).unwrap();
        assert_eq!(body.target().unwrap(), VoteTarget::Term);

        let body: VoteBody = serde_json::from_str(
            r#"{"entry_id":"1","direction":"downvote","definition_id":"def1-1"}"#,
        )
        .unwrap();
        assert_eq!(body.target().unwrap(), VoteTarget::Definition("def1-1".into()));

        let body: VoteBody = serde_json::from_str(
            r#"{"entry_id":"1","direction":"upvote","target":"definition"}"#,
        )
        .unwrap();
        assert!(matches!(body.target(), Err(GatewayError::BadRequest(_))));
    }

    #[test]
    fn test_year_range_bounds() {
        assert_eq!(year_range("").unwrap(), DEFAULT_YEARS);
        assert_eq!(year_range("from=2021").unwrap(), 2021..=2025);
        assert_eq!(year_range("from=1926&to=2025").unwrap(), 1926..=2025);

        for query in [
            "from=1925&to=2025",
            "from=-2147483648&to=2147483647",
            "from=2025&to=2020",
        ] {
            assert!(
                matches!(year_range(query), Err(GatewayError::BadRequest(_))),
                "{} should be rejected",
                query
            );
        }
    }

    #[test]
    fn test_year_param() {
        assert_eq!(year_param("from=2021", "from").unwrap(), Some(2021));
        assert_eq!(year_param("", "from").unwrap(), None);
        assert!(matches!(
            year_param("from=soon", "from"),
            Err(GatewayError::BadRequest(_))
        ));
    }
}
