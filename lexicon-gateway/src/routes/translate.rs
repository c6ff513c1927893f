//! Session-free endpoints: translation and boomer traps.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use lexicon::translate::{self as translator, Direction};
use lexicon::BoomerTrap;
use serde::{Deserialize, Serialize};

use super::api::{json_response, parse_body};
use super::sessions::query_param;
use crate::server::AppState;
use crate::types::Result;

#[derive(Debug, Deserialize)]
struct TranslateBody {
    text: String,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub direction: Direction,
    pub translation: String,
}

#[derive(Debug, Serialize)]
pub struct TrapsResponse<'a> {
    pub traps: Vec<&'a BoomerTrap>,
}

pub async fn translate(
    state: &AppState,
    direction: Direction,
    body: &[u8],
) -> Result<Response<Full<Bytes>>> {
    let body: TranslateBody = parse_body(body)?;
    let translation =
        translator::translate(state.translator.as_ref(), direction, &body.text).await?;
    json_response(
        StatusCode::OK,
        &TranslateResponse {
            direction,
            translation,
        },
    )
}

/// All traps, or only those for `?term=`.
pub fn traps(state: &AppState, query: &str) -> Result<Response<Full<Bytes>>> {
    let traps = match query_param(query, "term") {
        Some(term) => lexicon::traps::for_term(&state.seed.traps, &term),
        None => state.seed.traps.iter().collect(),
    };
    json_response(StatusCode::OK, &TrapsResponse { traps })
}
