//! Lexicon gateway
//!
//! Serves per-session `ViewController`s over HTTP. Sessions start from a
//! first-load address, share one immutable seed, and keep their votes,
//! filters and battle state to themselves.

pub mod config;
pub mod routes;
pub mod server;
pub mod sessions;
pub mod types;

pub use config::Args;
pub use server::AppState;
pub use types::{GatewayError, Result};
