//! Gateway errors and their HTTP mapping.

use hyper::StatusCode;
use lexicon::{BattleError, TranslateError};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("{0} does not exist")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// The session store is full.
    #[error("session limit reached: {0}")]
    Capacity(String),

    /// A collaborator (text generation, mention feeds) failed.
    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("internal failure: {0}")]
    Internal(String),

    #[error("bad configuration: {0}")]
    Config(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Capacity(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable code carried in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Capacity(_) => "CAPACITY",
            Self::Upstream(_) => "UPSTREAM",
            Self::Internal(_) => "INTERNAL",
            Self::Config(_) => "CONFIG",
        }
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("malformed JSON body: {}", err))
    }
}

impl From<lexicon::SeedError> for GatewayError {
    fn from(err: lexicon::SeedError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<lexicon::ParseEnumError> for GatewayError {
    fn from(err: lexicon::ParseEnumError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<BattleError> for GatewayError {
    fn from(err: BattleError) -> Self {
        match err {
            BattleError::AlreadyVoted(_) => Self::Conflict(err.to_string()),
            BattleError::UnknownTerm { .. } => Self::BadRequest(err.to_string()),
            BattleError::UnknownBattle(_) => Self::NotFound(err.to_string()),
        }
    }
}

impl From<TranslateError> for GatewayError {
    fn from(err: TranslateError) -> Self {
        match err {
            TranslateError::EmptyInput => Self::BadRequest(err.to_string()),
            TranslateError::Collaborator(e) => Self::Upstream(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
