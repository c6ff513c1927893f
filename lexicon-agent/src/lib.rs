//! Lexicon Agent - external collaborators
//!
//! Implements the collaborator contracts of the `lexicon` core:
//! - Trait-based LLM backends (OpenAI-compatible HTTP, mock)
//! - Definition generation for unknown terms (JSON mode, validated)
//! - Slang/plain-language translation
//! - "In the wild" mention sources (JSON HTTP endpoints, static fixtures)
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────┐   ┌───────────────────────┐
//! │ LlmDefinitionGenerator│   │ LlmTranslator         │
//! └───────────┬───────────┘   └───────────┬───────────┘
//!             └─────────────┬─────────────┘
//!                           ▼
//!                   ┌──────────────┐
//!                   │ LlmBackend   │
//!                   │ (OpenAI/Mock)│
//!                   └──────────────┘
//! ```

pub mod backend;
pub mod flows;
pub mod mentions;
pub mod prompts;

// Re-export main types for convenience
pub use backend::{Completion, LlmBackend, LlmError, MockBackend, OpenAiBackend, OutputMode, Prompt};
pub use flows::{LlmDefinitionGenerator, LlmTranslator};
pub use mentions::{HttpMentionSource, StaticMentionSource};
