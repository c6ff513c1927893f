//! Translator front end: slang to plain language and back.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::collaborators::{CollaboratorError, Translator};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("nothing to translate")]
    EmptyInput,

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    ToPlain,
    ToSlang,
}

/// Translate `text` in `direction`.
///
/// Input is trimmed; blank input is rejected without calling the translator.
pub async fn translate(
    translator: &dyn Translator,
    direction: Direction,
    text: &str,
) -> Result<String, TranslateError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TranslateError::EmptyInput);
    }

    debug!(?direction, chars = text.len(), "Translating");
    let result = match direction {
        Direction::ToPlain => translator.to_plain(text).await,
        Direction::ToSlang => translator.to_slang(text).await,
    };

    match result {
        Ok(out) if out.trim().is_empty() => Err(CollaboratorError::Empty.into()),
        Ok(out) => Ok(out.trim().to_string()),
        Err(e) => {
            warn!(?direction, error = %e, "Translation failed");
            Err(e.into())
        }
    }
}
