//! REST API router
//!
//! Routes:
//! - `POST /api/v1/sessions?search=..&region=..&category=..` - open a session from a first-load address
//! - `GET  /api/v1/sessions/{id}` - current listing view
//! - `POST /api/v1/sessions/{id}/search` - submit a term
//! - `POST /api/v1/sessions/{id}/categories/{category}` - toggle a category filter
//! - `POST /api/v1/sessions/{id}/region` - change the region filter
//! - `POST /api/v1/sessions/{id}/retry` - re-run the current query
//! - `POST /api/v1/sessions/{id}/votes` - vote on a term or community definition
//! - `GET  /api/v1/sessions/{id}/battle` - current slang battle
//! - `POST /api/v1/sessions/{id}/battle/votes` - vote in the battle
//! - `GET  /api/v1/sessions/{id}/trending` - trending terms
//! - `GET  /api/v1/sessions/{id}/timeline` - terms grouped by year
//! - `GET  /api/v1/traps?term=..` - boomer traps
//! - `POST /api/v1/translate/plain` - slang to plain language
//! - `POST /api/v1/translate/slang` - plain language to slang

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Method, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use super::{sessions, translate};
use crate::server::AppState;
use crate::types::{GatewayError, Result};

/// Parsed API route
#[derive(Debug, PartialEq, Eq)]
pub enum ApiRoute<'a> {
    CreateSession,
    GetSession(&'a str),
    Search(&'a str),
    ToggleCategory { session: &'a str, category: &'a str },
    Region(&'a str),
    Retry(&'a str),
    Vote(&'a str),
    Battle(&'a str),
    BattleVote(&'a str),
    Trending(&'a str),
    Timeline(&'a str),
    Traps,
    TranslatePlain,
    TranslateSlang,
}

impl<'a> ApiRoute<'a> {
    pub fn parse(method: &Method, path: &'a str) -> Option<Self> {
        let rest = path.strip_prefix("/api/v1/")?.trim_end_matches('/');
        let segments: Vec<&'a str> = rest.split('/').collect();

        let route = match (method, segments.as_slice()) {
            (&Method::POST, &["sessions"]) => Self::CreateSession,
            (&Method::GET, &["sessions", id]) => Self::GetSession(id),
            (&Method::POST, &["sessions", id, "search"]) => Self::Search(id),
            (&Method::POST, &["sessions", id, "categories", category]) => Self::ToggleCategory {
                session: id,
                category,
            },
            (&Method::POST, &["sessions", id, "region"]) => Self::Region(id),
            (&Method::POST, &["sessions", id, "retry"]) => Self::Retry(id),
            (&Method::POST, &["sessions", id, "votes"]) => Self::Vote(id),
            (&Method::GET, &["sessions", id, "battle"]) => Self::Battle(id),
            (&Method::POST, &["sessions", id, "battle", "votes"]) => Self::BattleVote(id),
            (&Method::GET, &["sessions", id, "trending"]) => Self::Trending(id),
            (&Method::GET, &["sessions", id, "timeline"]) => Self::Timeline(id),
            (&Method::GET, &["traps"]) => Self::Traps,
            (&Method::POST, &["translate", "plain"]) => Self::TranslatePlain,
            (&Method::POST, &["translate", "slang"]) => Self::TranslateSlang,
            _ => return None,
        };
        Some(route)
    }
}

/// API error response
#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
    code: &'static str,
}

/// Handle REST API requests
pub async fn handle_api_request(
    state: Arc<AppState>,
    method: &Method,
    path: &str,
    query: Option<&str>,
    body: Bytes,
) -> Response<Full<Bytes>> {
    let Some(route) = ApiRoute::parse(method, path) else {
        return error_response(GatewayError::NotFound(format!("{} {}", method, path)));
    };
    debug!(?route, "API route");

    let query = query.unwrap_or("");
    let result = match route {
        ApiRoute::CreateSession => sessions::create(&state, query).await,
        ApiRoute::GetSession(id) => sessions::show(&state, id).await,
        ApiRoute::Search(id) => sessions::search(&state, id, &body).await,
        ApiRoute::ToggleCategory { session, category } => {
            sessions::toggle_category(&state, session, category).await
        }
        ApiRoute::Region(id) => sessions::set_region(&state, id, &body).await,
        ApiRoute::Retry(id) => sessions::retry(&state, id).await,
        ApiRoute::Vote(id) => sessions::vote(&state, id, &body).await,
        ApiRoute::Battle(id) => sessions::battle(&state, id).await,
        ApiRoute::BattleVote(id) => sessions::vote_battle(&state, id, &body).await,
        ApiRoute::Trending(id) => sessions::trending(&state, id, query).await,
        ApiRoute::Timeline(id) => sessions::timeline(&state, id, query).await,
        ApiRoute::Traps => translate::traps(&state, query),
        ApiRoute::TranslatePlain => {
            translate::translate(&state, lexicon::translate::Direction::ToPlain, &body).await
        }
        ApiRoute::TranslateSlang => {
            translate::translate(&state, lexicon::translate::Direction::ToSlang, &body).await
        }
    };

    result.unwrap_or_else(|err| {
        warn!(path, error = %err, "API request failed");
        error_response(err)
    })
}

/// Decode a JSON request body.
pub(crate) fn parse_body<T: for<'de> Deserialize<'de>>(body: &[u8]) -> Result<T> {
    if body.is_empty() {
        return Err(GatewayError::BadRequest("request body is required".to_string()));
    }
    Ok(serde_json::from_slice(body)?)
}

/// Build a JSON response
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Result<Response<Full<Bytes>>> {
    let body = serde_json::to_vec(value).map_err(|e| GatewayError::Internal(e.to_string()))?;

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Cache-Control", "no-cache")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .map_err(|e| GatewayError::Internal(e.to_string()))
}

/// JSON body `{error, code}` with the error's status.
pub fn error_response(err: GatewayError) -> Response<Full<Bytes>> {
    let status = err.status_code();
    let body = serde_json::to_vec(&ApiError {
        error: err.to_string(),
        code: err.code(),
    })
    .unwrap_or_default();

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Cache-Control", "no-cache")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| {
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Full::new(Bytes::from(r#"{"error":"internal failure","code":"INTERNAL"}"#)))
                .unwrap()
        })
}
