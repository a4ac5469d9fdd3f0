use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::api::{Backend, HttpBackend};
use crate::config::AppConfig;
use crate::session::{SessionStore, WidgetSession};
use crate::ui::{fragments, widget_page};
use crate::widget::{AdminAction, ChatClient, QueryOutcome};

/// How often idle page sessions are swept.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::from_config(&config.backend)?);

    info!(
        name: "backend.config.loaded",
        base_url = %config.backend.base_url,
        timeout_secs = ?config.backend.timeout_secs,
        "Backend configuration loaded"
    );

    let state = AppState {
        backend,
        sessions: SessionStore::new(),
        config: Arc::clone(&config),
    };

    // Sweep idle page sessions
    let sessions = state.sessions.clone();
    let ttl = Duration::from_secs(config.server.session_ttl_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = sessions.cleanup_expired_with_timeout(ttl);
            if removed > 0 {
                info!(name: "session.expired", removed, "Expired idle page sessions");
            }
        }
    });

    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the widget router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/widget/{session}/setup", post(setup_handler))
        .route("/widget/{session}/import", post(import_handler))
        .route("/widget/{session}/query", post(query_handler))
        .route("/widget/{session}/transcript", get(transcript_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Widget page with a fresh page session.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let session = state.sessions.create();
    tracing::debug!(session_id = %session.id(), "Created page session");
    Html(widget_page(&session, &state.config.server.htmx_src))
}

/// GET /health - Liveness probe.
async fn health_handler() -> &'static str {
    "ok"
}

// ─────────────────────────────────────────────────────────────────────────────
// Widget Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Form body of a query submission.
#[derive(Debug, Deserialize)]
struct QueryForm {
    /// Raw input field value.
    #[serde(default)]
    question: String,
}

fn lookup(state: &AppState, id: &str) -> Result<WidgetSession, StatusCode> {
    state.sessions.get(id).ok_or_else(|| {
        tracing::warn!(session_id = %id, "Unknown page session");
        StatusCode::NOT_FOUND
    })
}

async fn run_admin(state: &AppState, id: &str, action: AdminAction) -> Result<Html<String>, StatusCode> {
    let session = lookup(state, id)?;
    let client = ChatClient::for_session(Arc::clone(&state.backend), &session);
    client.run_admin(action).await;

    // Render what is displayed now; a newer trigger may own the line.
    Ok(Html(fragments::status_line(
        action,
        session.status(action).as_ref(),
    )))
}

/// POST /widget/{session}/setup - Seed the sample database.
async fn setup_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, StatusCode> {
    run_admin(&state, &id, AdminAction::Setup).await
}

/// POST /widget/{session}/import - Import CSV files.
async fn import_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, StatusCode> {
    run_admin(&state, &id, AdminAction::ImportCsv).await
}

/// POST /widget/{session}/query - Ask a question.
async fn query_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<QueryForm>,
) -> Response {
    let session = match lookup(&state, &id) {
        Ok(s) => s,
        Err(status) => return status.into_response(),
    };

    let client = ChatClient::for_session(Arc::clone(&state.backend), &session);
    match client.submit_query(&form.question).await {
        QueryOutcome::Ignored => StatusCode::NO_CONTENT.into_response(),
        QueryOutcome::Answered | QueryOutcome::Failed => {
            Html(fragments::query_reply(&session)).into_response()
        }
    }
}

/// GET /widget/{session}/transcript - Current transcript.
async fn transcript_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, StatusCode> {
    let session = lookup(&state, &id)?;
    Ok(Html(session.transcript().to_html()))
}
