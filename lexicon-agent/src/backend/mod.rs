//! Text-generation backends: OpenAI-compatible HTTP and an offline mock.

pub mod mock;
pub mod openai;
pub mod traits;

pub use mock::MockBackend;
pub use openai::OpenAiBackend;
pub use traits::{Completion, LlmBackend, LlmError, OutputMode, Prompt};
