use std::{collections::VecDeque, sync::Arc, time::Instant};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
    routing::{get, post},
    Router,
};
use pdpa_core::{
    config::Config, llm::CompletionBackend, report, Advisor, AdvisorError, SectionCatalog,
};
use pdpa_llm::{OllamaBackend, OpenAiBackend};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod logging;

// ── AppState ──────────────────────────────────────────────────────────────

pub struct AppState {
    pub advisor: Advisor,
    pub start_time: Instant,
    pub log_tx: broadcast::Sender<String>,
    pub log_ring: Arc<std::sync::Mutex<VecDeque<String>>>,
}

// ── Error helper ──────────────────────────────────────────────────────────

fn internal(e: impl std::fmt::Display) -> StatusCode {
    tracing::error!("internal error: {e}");
    StatusCode::INTERNAL_SERVER_ERROR
}

// ── Request body types ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct AnalyzeBody {
    scenario: String,
    top_k: Option<usize>,
}

// ── main ──────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (log_tx, _log_rx) = broadcast::channel::<String>(256);
    let log_ring = Arc::new(std::sync::Mutex::new(VecDeque::new()));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdpa_server=info,pdpa_core=info,pdpa_llm=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(logging::BroadcastLayer {
            tx: log_tx.clone(),
            ring: Arc::clone(&log_ring),
        })
        .init();

    let config = Config::from_env()?;

    let catalog = Arc::new(SectionCatalog::load(&config.csv_path)?);

    let backend: Arc<dyn CompletionBackend> = match config.backend.as_str() {
        "ollama" => Arc::new(
            OllamaBackend::new(&config.ollama_base_url, &config.ollama_model)
                .with_timeout(config.request_timeout_s),
        ),
        _ => Arc::new(
            OpenAiBackend::new(
                &config.openai_base_url,
                &config.openai_api_key,
                config.models.clone(),
            )
            .with_timeout(config.request_timeout_s),
        ),
    };

    let advisor = Advisor::new(catalog, backend).with_top_k(config.top_k);

    let state = Arc::new(AppState {
        advisor,
        start_time: Instant::now(),
        log_tx,
        log_ring,
    });

    let serve_dir = ServeDir::new(&config.web_static_dir);

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/status", get(get_status))
        .route("/api/sections", get(list_sections))
        .route("/api/sections/:id", get(get_section))
        .route("/api/analyze", post(analyze))
        .route("/api/logs", get(sse_logs))
        .route("/api/logs/history", get(log_history))
        .fallback_service(serve_dir)
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.web_bind, config.web_port);
    info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_s": state.start_time.elapsed().as_secs(),
        "sections_loaded": state.advisor.catalog().len(),
        "top_k": state.advisor.top_k,
    }))
}

async fn list_sections(State(state): State<Arc<AppState>>) -> Json<Value> {
    let sections: Vec<Value> = state
        .advisor
        .catalog()
        .sections()
        .iter()
        .map(|s| json!({ "id": s.id, "title": s.title }))
        .collect();
    Json(json!(sections))
}

async fn get_section(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match state.advisor.catalog().get(&id) {
        None => Err(StatusCode::NOT_FOUND),
        Some(section) => Ok(Json(serde_json::to_value(section).map_err(internal)?)),
    }
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let advisor = &state.advisor;
    let top_k = body.top_k.unwrap_or(advisor.top_k);

    match advisor
        .generate_advice_with_top_k(&body.scenario, top_k)
        .await
    {
        Ok(advice) => {
            let degraded = advice.is_degraded();
            let rejected = advice.is_rejection();
            let report = report::render(&advice);
            Ok(Json(json!({
                "advice": advice,
                "degraded": degraded,
                "rejected": rejected,
                "report": report,
            })))
        }
        Err(e) => Err(advisor_error_response(e)),
    }
}

fn advisor_error_response(e: AdvisorError) -> (StatusCode, Json<Value>) {
    let status = match &e {
        AdvisorError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        AdvisorError::Synthesis(_) | AdvisorError::Retrieval(_) => StatusCode::BAD_GATEWAY,
        AdvisorError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::error!("analyze failed: {e}");
    (status, Json(json!({ "error": e.to_string() })))
}

// ── SSE logs ──────────────────────────────────────────────────────────────

async fn log_history(State(state): State<Arc<AppState>>) -> Json<Value> {
    let lines: Vec<String> = state
        .log_ring
        .lock()
        .map(|ring| ring.iter().cloned().collect())
        .unwrap_or_default();
    Json(json!({ "lines": lines }))
}

async fn sse_logs(
    State(state): State<Arc<AppState>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let rx = state.log_tx.subscribe();
    let stream =
        BroadcastStream::new(rx).filter_map(|msg| msg.ok().map(|data| Ok(Event::default().data(data))));
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(std::time::Duration::from_secs(15))
            .text("ping"),
    )
}
