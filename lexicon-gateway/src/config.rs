//! Configuration for the Lexicon gateway
//!
//! CLI arguments and environment variable handling using clap.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Lexicon gateway - HTTP front end for the slang dictionary
#[derive(Parser, Debug, Clone)]
#[command(name = "lexicon-gateway")]
#[command(about = "HTTP gateway serving per-session Lexicon views")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Text-generation backend configuration
    #[command(flatten)]
    pub llm: LlmArgs,

    /// Mention source configuration
    #[command(flatten)]
    pub mentions: MentionArgs,

    /// Seed file (JSON or YAML); the built-in seed is used when unset
    #[arg(long, env = "SEED_FILE")]
    pub seed_file: Option<PathBuf>,

    /// Overall deadline for one search, collaborators included
    #[arg(long, env = "SEARCH_TIMEOUT_MS", default_value = "15000")]
    pub search_timeout_ms: u64,

    /// Maximum number of concurrent sessions
    #[arg(long, env = "MAX_SESSIONS", default_value = "10000")]
    pub max_sessions: usize,

    /// Sessions older than this are dropped
    #[arg(long, env = "SESSION_TTL_SECS", default_value = "86400")]
    pub session_ttl_secs: u64,
}

/// OpenAI-compatible backend configuration
#[derive(Parser, Debug, Clone)]
pub struct LlmArgs {
    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "LLM_BASE_URL", default_value = "http://localhost:11434/v1")]
    pub llm_base_url: String,

    /// Model name
    #[arg(long, env = "LLM_MODEL", default_value = "llama3.2")]
    pub llm_model: String,

    /// API key (optional for local servers)
    #[arg(long, env = "LLM_API_KEY")]
    pub llm_api_key: Option<String>,

    /// Per-request timeout in milliseconds, also used by HTTP mention sources
    #[arg(long, env = "LLM_TIMEOUT_MS", default_value = "10000")]
    pub llm_timeout_ms: u64,

    /// Use the offline mock backend instead of a model server
    #[arg(long, env = "MOCK_LLM", default_value = "false")]
    pub mock_llm: bool,
}

/// Mention endpoints; unset sources use static fixtures
#[derive(Parser, Debug, Clone)]
pub struct MentionArgs {
    #[arg(long, env = "TWEETS_URL")]
    pub tweets_url: Option<String>,

    #[arg(long, env = "VIDEOS_URL")]
    pub videos_url: Option<String>,

    #[arg(long, env = "POSTS_URL")]
    pub posts_url: Option<String>,
}

impl Args {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_millis(self.llm.llm_timeout_ms)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.session_ttl_secs == 0 {
            return Err("SESSION_TTL_SECS must be greater than zero".to_string());
        }

        if self.search_timeout_ms == 0 {
            return Err("SEARCH_TIMEOUT_MS must be greater than zero".to_string());
        }

        if self.llm.llm_timeout_ms == 0 {
            return Err("LLM_TIMEOUT_MS must be greater than zero".to_string());
        }

        // Mention sources share the LLM client timeout and must answer
        // inside the search deadline.
        if self.llm.llm_timeout_ms > self.search_timeout_ms {
            return Err(format!(
                "LLM_TIMEOUT_MS ({}) must not exceed SEARCH_TIMEOUT_MS ({})",
                self.llm.llm_timeout_ms, self.search_timeout_ms
            ));
        }

        if self.max_sessions == 0 {
            return Err("MAX_SESSIONS must be greater than zero".to_string());
        }

        if !self.llm.mock_llm {
            let url = &self.llm.llm_base_url;
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("LLM_BASE_URL must be an http(s) URL, got {}", url));
            }
        }

        for (name, url) in [
            ("TWEETS_URL", &self.mentions.tweets_url),
            ("VIDEOS_URL", &self.mentions.videos_url),
            ("POSTS_URL", &self.mentions.posts_url),
        ] {
            if let Some(url) = url {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(format!("{} must be an http(s) URL, got {}", name, url));
                }
            }
        }

        if let Some(path) = &self.seed_file {
            if !path.exists() {
                return Err(format!("SEED_FILE {} does not exist", path.display()));
            }
        }

        Ok(())
    }
}
