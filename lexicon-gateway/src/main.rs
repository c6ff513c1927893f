//! Lexicon gateway - HTTP front end for the slang dictionary

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lexicon_gateway::{
    config::{Args, LogFormat},
    server::{self, AppState},
};

fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lexicon_gateway={l},lexicon={l},lexicon_agent={l},info",
            l = args.log_level
        ))
    });
    let registry = tracing_subscriber::registry().with(filter);
    match args.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(&args);

    if let Err(e) = args.validate() {
        error!(error = %e, "refusing to start");
        std::process::exit(1);
    }

    let seed = args
        .seed_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    let llm = if args.llm.mock_llm {
        "mock".to_string()
    } else {
        format!("{} @ {}", args.llm.llm_model, args.llm.llm_base_url)
    };
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %args.listen,
        %llm,
        %seed,
        search_timeout_ms = args.search_timeout_ms,
        max_sessions = args.max_sessions,
        "Starting lexicon gateway"
    );

    let state = match AppState::from_args(args) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!(error = %e, "startup failed");
            std::process::exit(1);
        }
    };

    server::run(state).await?;
    Ok(())
}
