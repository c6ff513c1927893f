//! Connection handling and application wiring.
//!
//! One tokio task per connection, hyper http1 on top. API bodies are read
//! whole (bounded by [`MAX_BODY_BYTES`]) before routing.

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use lexicon::{Collaborators, MentionKind, MentionSource, SeedBundle, Translator};
use lexicon_agent::{
    HttpMentionSource, LlmBackend, LlmDefinitionGenerator, LlmTranslator, MockBackend,
    OpenAiBackend, StaticMentionSource,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::config::Args;
use crate::routes;
use crate::sessions::SessionStore;
use crate::types::{GatewayError, Result};

type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Largest request body the API accepts.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Everything a request handler can reach.
pub struct AppState {
    pub args: Args,
    pub seed: Arc<SeedBundle>,
    pub sessions: SessionStore,
    pub collaborators: Collaborators,
    pub translator: Arc<dyn Translator>,
    /// Identifier of the text-generation backend, reported by /health
    pub backend_id: String,
}

impl AppState {
    pub fn new(
        args: Args,
        seed: SeedBundle,
        collaborators: Collaborators,
        translator: Arc<dyn Translator>,
        backend_id: impl Into<String>,
    ) -> Self {
        let seed = Arc::new(seed);
        let sessions =
            SessionStore::new(Arc::clone(&seed), args.max_sessions, args.search_timeout());
        Self {
            args,
            seed,
            sessions,
            collaborators,
            translator,
            backend_id: backend_id.into(),
        }
    }

    /// Load the seed and wire collaborators from configuration.
    pub fn from_args(args: Args) -> Result<Self> {
        let seed = match &args.seed_file {
            Some(path) => {
                let bundle = SeedBundle::load(path)?;
                info!(path = %path.display(), entries = bundle.entries.len(), "Loaded seed file");
                bundle
            }
            None => lexicon::seed::default_bundle(),
        };

        let backend: Arc<dyn LlmBackend> = if args.llm.mock_llm {
            warn!("Using mock text-generation backend");
            Arc::new(MockBackend::new("mock"))
        } else {
            let backend = OpenAiBackend::new(
                args.llm.llm_base_url.clone(),
                args.llm.llm_model.clone(),
                args.llm.llm_api_key.clone(),
                args.llm_timeout(),
            )
            .map_err(|e| GatewayError::Config(e.to_string()))?;
            Arc::new(backend)
        };
        let backend_id = backend.id().to_string();

        let mention_sources = mention_sources(&args)?;
        let generator = Arc::new(LlmDefinitionGenerator::new(Arc::clone(&backend)));
        let translator: Arc<dyn Translator> = Arc::new(LlmTranslator::new(backend));

        Ok(Self::new(
            args,
            seed,
            Collaborators::new(generator, mention_sources),
            translator,
            backend_id,
        ))
    }
}

/// One source per mention kind; kinds without a configured URL use fixtures.
fn mention_sources(args: &Args) -> Result<Vec<Arc<dyn MentionSource>>> {
    let configured = [
        (MentionKind::Tweet, &args.mentions.tweets_url),
        (MentionKind::ShortVideo, &args.mentions.videos_url),
        (MentionKind::ForumPost, &args.mentions.posts_url),
    ];

    let mut sources: Vec<Arc<dyn MentionSource>> = Vec::with_capacity(configured.len());
    for (kind, url) in configured {
        match url {
            Some(url) => {
                let source = HttpMentionSource::new(kind, url.clone(), args.llm_timeout())
                    .map_err(|e| GatewayError::Config(e.to_string()))?;
                info!(kind = kind.as_str(), url = %url, "Using HTTP mention source");
                sources.push(Arc::new(source));
            }
            None => {
                debug!(kind = kind.as_str(), "Using static mention fixtures");
                sources.push(Arc::new(StaticMentionSource::new(kind)));
            }
        }
    }
    Ok(sources)
}

/// Periodically drop sessions older than the configured TTL.
fn spawn_session_expiry(state: Arc<AppState>) {
    let ttl = state.args.session_ttl();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60).min(ttl));
        loop {
            interval.tick().await;
            let removed = state.sessions.expire(ttl);
            if removed > 0 {
                info!(removed, remaining = state.sessions.len(), "Session expiry sweep");
            }
        }
    });
}

/// Bind the listener and serve until the process exits.
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;
    info!(
        listen = %state.args.listen,
        backend = %state.backend_id,
        max_sessions = state.sessions.max_sessions(),
        ttl_secs = state.args.session_ttl_secs,
        "Gateway accepting connections"
    );

    spawn_session_expiry(Arc::clone(&state));

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "accept failed");
                continue;
            }
        };
        tokio::spawn(serve_connection(Arc::clone(&state), stream, peer));
    }
}

async fn serve_connection(state: Arc<AppState>, stream: TcpStream, peer: SocketAddr) {
    let service = service_fn(move |req| dispatch(Arc::clone(&state), peer, req));
    let served = http1::Builder::new()
        .preserve_header_case(true)
        .title_case_headers(true)
        .serve_connection(TokioIo::new(stream), service)
        .await;
    if let Err(e) = served {
        error!(%peer, error = ?e, "connection ended with error");
    }
}

async fn dispatch(
    state: Arc<AppState>,
    peer: SocketAddr,
    req: Request<Incoming>,
) -> std::result::Result<Response<BoxBody>, hyper::Error> {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = uri.path();
    debug!(%peer, %method, path, "request");

    if method == Method::OPTIONS {
        return Ok(boxed(preflight()));
    }
    if method == Method::GET && matches!(path, "/health" | "/healthz") {
        return Ok(boxed(routes::health_check(&state)));
    }
    if !path.starts_with("/api/v1/") {
        return Ok(boxed(unrouted(path)));
    }

    let response = match read_body(req.into_body()).await {
        Ok(body) => routes::handle_api_request(state, &method, path, uri.query(), body).await,
        Err(e) => routes::error_response(e),
    };
    info!(%peer, %method, path, status = response.status().as_u16(), "handled");
    Ok(boxed(response))
}

/// Collect a request body, giving up once it passes [`MAX_BODY_BYTES`].
async fn read_body<B>(body: B) -> Result<Bytes>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(GatewayError::BadRequest(format!(
            "request body exceeds {} bytes",
            MAX_BODY_BYTES
        ))),
        Err(e) => Err(GatewayError::BadRequest(format!("unreadable request body: {}", e))),
    }
}

fn boxed(response: Response<Full<Bytes>>) -> Response<BoxBody> {
    response.map(|body| body.map_err(|never| match never {}).boxed())
}

fn preflight() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .header("Access-Control-Max-Age", "600")
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// JSON 404 for paths outside the health and API prefixes.
fn unrouted(path: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": format!("no route for {}", path),
        "code": "NOT_FOUND",
    });
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}
