//! Axum web server: one page, a question endpoint, and the session history.

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    serve, Json, Router,
};
use minijinja::{path_loader, Environment};
use minijinja_autoreload::AutoReloader;
use serde::Deserialize;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use crate::database::Database;
use crate::history::ChatHistory;
use crate::llm::SqlService;
use crate::pipeline::{process_question, OutputSettings};
use crate::question_log::QuestionLog;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    templates: Arc<AutoReloader>,
    pub history: Arc<ChatHistory>,
    pub service: SqlService,
    pub db: Database,
    pub log: QuestionLog,
}

impl AppState {
    pub fn new(service: SqlService, db: Database, log: QuestionLog) -> Result<Self> {
        Ok(Self {
            templates: Arc::new(create_minijinja_env()?),
            history: Arc::new(ChatHistory::new()),
            service,
            db,
            log,
        })
    }
}

// Minijinja Environment setup. AutoReloader picks up template edits during
// development without a restart.
fn create_minijinja_env() -> Result<AutoReloader> {
    let reloader = AutoReloader::new(|notifier| {
        let mut env = Environment::new();
        env.set_loader(path_loader("templates"));
        notifier.watch_path("templates", true);
        Ok(env)
    });
    Ok(reloader)
}

async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    let rendered = state.templates.acquire_env().and_then(|env| {
        env.get_template("index.html").and_then(|tmpl| {
            tmpl.render(minijinja::context! {
                title => "askdb",
                subtitle => "Ask questions about your data in plain language",
            })
        })
    });
    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render index template: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal Server Error: {}", e),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub settings: OutputSettings,
}

async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> impl IntoResponse {
    let question = request.question.trim();
    if question.is_empty() {
        return (StatusCode::BAD_REQUEST, "question must not be empty").into_response();
    }

    let turn = process_question(
        &state.service,
        &state.db,
        &state.log,
        question,
        &request.settings,
    )
    .await;
    state.history.push(turn.clone());
    Json(turn).into_response()
}

async fn history_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.history.snapshot())
}

async fn healthz_handler() -> &'static str {
    "ok"
}

/// Build the full router; separated from [`start_web_server`] so tests can
/// drive it in-process.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/question", post(ask_handler))
        .route("/api/history", get(history_handler))
        .route("/healthz", get(healthz_handler))
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_web_server(port: u16, state: AppState) -> Result<()> {
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    serve(listener, app.into_make_service())
        .await
        .context("Web server failed")?;

    Ok(())
}
