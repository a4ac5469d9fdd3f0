//! The chat client: binds actions to display sinks.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info};

use crate::api::Backend;
use crate::session::{Message, WidgetSession};
use crate::widget::actions::{self, QueryAnswer};
use crate::widget::sinks::{
    AdminAction, AdminStatus, QueryDisplaySink, StatusSink, StatusTone, TranscriptSink,
};

/// Generation counter for one kind of request.
///
/// Each issued request takes a new generation; a response may only write
/// shared display state while its generation is still the latest one.
#[derive(Debug, Default)]
pub struct InFlight {
    current: Mutex<u64>,
}

impl InFlight {
    /// Issue a new generation, running `on_issue` while it becomes current.
    pub fn begin(&self, on_issue: impl FnOnce()) -> u64 {
        let mut current = self.current.lock().unwrap();
        *current += 1;
        on_issue();
        *current
    }

    /// Run `apply` if `token` is still current. Returns whether it ran.
    pub fn finish(&self, token: u64, apply: impl FnOnce()) -> bool {
        let current = self.current.lock().unwrap();
        if *current == token {
            apply();
            true
        } else {
            false
        }
    }
}

/// In-flight tokens of one widget page.
#[derive(Debug, Default)]
pub struct InFlightTokens {
    setup: InFlight,
    import_csv: InFlight,
    query_display: InFlight,
}

impl InFlightTokens {
    /// Fresh tokens with nothing in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn admin(&self, action: AdminAction) -> &InFlight {
        match action {
            AdminAction::Setup => &self.setup,
            AdminAction::ImportCsv => &self.import_csv,
        }
    }
}

/// Result of a query submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Input was empty after trimming; nothing happened.
    Ignored,
    /// The answer was appended to the transcript.
    Answered,
    /// An error message was appended to the transcript.
    Failed,
}

/// Chat widget core.
///
/// Owns no display state: the transcript, status lines and query pane are
/// injected as sinks. The placeholder of a query is always removed exactly
/// once, whatever the outcome.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use nlq_chat::api::HttpBackend;
/// use nlq_chat::session::SessionStore;
/// use nlq_chat::widget::ChatClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = Arc::new(HttpBackend::new("http://localhost:5000")?);
/// let session = SessionStore::new().create();
/// let client = ChatClient::for_session(backend, &session);
///
/// client.setup().await;
/// client.submit_query("Which products cost more than 500?").await;
/// println!("{}", session.transcript().to_html());
/// # Ok(())
/// # }
/// ```
pub struct ChatClient {
    backend: Arc<dyn Backend>,
    transcript: Arc<dyn TranscriptSink>,
    status: Arc<dyn StatusSink>,
    query_display: Arc<dyn QueryDisplaySink>,
    tokens: Arc<InFlightTokens>,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("backend", &self.backend)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    /// Create a client with fresh in-flight tokens.
    pub fn new(
        backend: Arc<dyn Backend>,
        transcript: Arc<dyn TranscriptSink>,
        status: Arc<dyn StatusSink>,
        query_display: Arc<dyn QueryDisplaySink>,
    ) -> Self {
        Self::with_tokens(
            backend,
            transcript,
            status,
            query_display,
            Arc::new(InFlightTokens::new()),
        )
    }

    /// Create a client sharing existing in-flight tokens.
    ///
    /// Clients built over the same surfaces must share tokens for stale
    /// responses to be recognised across them.
    pub fn with_tokens(
        backend: Arc<dyn Backend>,
        transcript: Arc<dyn TranscriptSink>,
        status: Arc<dyn StatusSink>,
        query_display: Arc<dyn QueryDisplaySink>,
        tokens: Arc<InFlightTokens>,
    ) -> Self {
        Self {
            backend,
            transcript,
            status,
            query_display,
            tokens,
        }
    }

    /// Create a client writing to a page session's surfaces.
    pub fn for_session(backend: Arc<dyn Backend>, session: &WidgetSession) -> Self {
        let surfaces = Arc::new(session.clone());
        Self::with_tokens(
            backend,
            Arc::clone(&surfaces) as Arc<dyn TranscriptSink>,
            Arc::clone(&surfaces) as Arc<dyn StatusSink>,
            surfaces as Arc<dyn QueryDisplaySink>,
            session.tokens(),
        )
    }

    /// Seed the sample database.
    pub async fn setup(&self) -> AdminStatus {
        self.run_admin(AdminAction::Setup).await
    }

    /// Import the backend's CSV files.
    pub async fn import_csv(&self) -> AdminStatus {
        self.run_admin(AdminAction::ImportCsv).await
    }

    /// Run an admin action, updating its status line.
    ///
    /// Returns the status this invocation produced. It is only displayed if
    /// no later invocation of the same action was issued in the meantime.
    pub async fn run_admin(&self, action: AdminAction) -> AdminStatus {
        let slot = self.tokens.admin(action);
        let token = slot.begin(|| {
            self.status.set_status(
                action,
                AdminStatus::new(action.working_text(), StatusTone::Working),
            );
        });

        info!(name: "widget.admin.started", action = action.as_str(), token, "Admin action started");

        let status = match actions::run_admin(self.backend.as_ref(), action).await {
            Ok(status) => {
                info!(name: "widget.admin.completed", action = action.as_str(), token, "Admin action completed");
                status
            }
            Err(e) => {
                error!(name: "widget.admin.failed", action = action.as_str(), token, error = %e, "Admin action failed");
                actions::admin_failure(action, &e)
            }
        };

        if !slot.finish(token, || self.status.set_status(action, status.clone())) {
            debug!(action = action.as_str(), token, "Discarding stale admin response");
        }
        status
    }

    /// Submit a question from the input field.
    ///
    /// Whitespace-only input is ignored. Otherwise the trimmed question and
    /// a processing placeholder are appended, the backend is asked, the
    /// placeholder is removed, and either the rendered answer or an error
    /// message is appended. Clearing the input field is left to the caller.
    pub async fn submit_query(&self, input: &str) -> QueryOutcome {
        let question = input.trim();
        if question.is_empty() {
            debug!("Ignoring empty question");
            return QueryOutcome::Ignored;
        }

        self.transcript.append(Message::user(question));
        let placeholder = Message::placeholder();
        let placeholder_id = placeholder.id.clone();
        self.transcript.append(placeholder);

        let token = self.tokens.query_display.begin(|| {});
        info!(
            name: "widget.query.sent",
            token,
            question_length = question.len(),
            "Query sent"
        );

        let result = actions::run_query(self.backend.as_ref(), question).await;

        if !self.transcript.remove(&placeholder_id) {
            debug!(placeholder = %placeholder_id, "Placeholder already gone");
        }

        match result {
            Ok(QueryAnswer { query, body }) => {
                if let Some(query) = query
                    && !self
                        .tokens
                        .query_display
                        .finish(token, || self.query_display.show_query(query))
                {
                    debug!(token, "Discarding stale generated query");
                }
                info!(name: "widget.query.answered", token, "Query answered");
                self.transcript.append(Message::system(body));
                QueryOutcome::Answered
            }
            Err(e) => {
                error!(name: "widget.query.failed", token, error = %e, "Query failed");
                self.transcript.append(Message::error(actions::query_error_text(&e)));
                QueryOutcome::Failed
            }
        }
    }
}
