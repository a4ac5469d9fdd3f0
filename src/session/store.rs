//! Page sessions and their storage.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::session::transcript::{Message, MessageId, Transcript};
use crate::widget::InFlightTokens;
use crate::widget::sinks::{AdminAction, AdminStatus, QueryDisplaySink, StatusSink, TranscriptSink};

/// Display surfaces of one loaded widget page.
///
/// Holds the transcript, both admin status lines, the query pane and the
/// in-flight tokens deciding which response may still write to them.
/// Implements every sink trait, so it can be handed to a
/// [`ChatClient`](crate::widget::ChatClient) directly.
#[derive(Debug, Clone)]
pub struct WidgetSession {
    inner: Arc<WidgetSessionInner>,
}

#[derive(Debug)]
struct WidgetSessionInner {
    /// Unique session identifier.
    id: String,
    transcript: Transcript,
    setup_status: RwLock<Option<AdminStatus>>,
    import_status: RwLock<Option<AdminStatus>>,
    query_display: RwLock<Option<String>>,
    /// Which request of each kind is current for this page.
    tokens: Arc<InFlightTokens>,
    last_activity: RwLock<DateTime<Utc>>,
}

impl WidgetSession {
    /// Create a new session with the given ID.
    fn new(id: String) -> Self {
        Self {
            inner: Arc::new(WidgetSessionInner {
                id,
                transcript: Transcript::new(),
                setup_status: RwLock::new(None),
                import_status: RwLock::new(None),
                query_display: RwLock::new(None),
                tokens: Arc::new(InFlightTokens::new()),
                last_activity: RwLock::new(Utc::now()),
            }),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// The session's transcript.
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.inner.transcript
    }

    /// Current status line of an admin action, if it ever ran.
    #[must_use]
    pub fn status(&self, action: AdminAction) -> Option<AdminStatus> {
        self.status_slot(action).read().unwrap().clone()
    }

    /// Text currently shown in the query pane.
    #[must_use]
    pub fn query_display(&self) -> Option<String> {
        self.inner.query_display.read().unwrap().clone()
    }

    /// In-flight tokens shared by every client driving this page.
    #[must_use]
    pub fn tokens(&self) -> Arc<InFlightTokens> {
        Arc::clone(&self.inner.tokens)
    }

    /// Update the last activity timestamp.
    pub fn touch(&self) {
        let mut guard = self.inner.last_activity.write().unwrap();
        *guard = Utc::now();
    }

    /// Check if the session has been idle longer than `timeout`.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        let last = *self.inner.last_activity.read().unwrap();
        // A negative span means clock skew; treat it as fresh.
        (Utc::now() - last)
            .to_std()
            .is_ok_and(|idle| idle > timeout)
    }

    fn status_slot(&self, action: AdminAction) -> &RwLock<Option<AdminStatus>> {
        match action {
            AdminAction::Setup => &self.inner.setup_status,
            AdminAction::ImportCsv => &self.inner.import_status,
        }
    }
}

impl TranscriptSink for WidgetSession {
    fn append(&self, message: Message) {
        self.inner.transcript.append(message);
        self.touch();
    }

    fn remove(&self, id: &MessageId) -> bool {
        self.inner.transcript.remove(id)
    }
}

impl StatusSink for WidgetSession {
    fn set_status(&self, action: AdminAction, status: AdminStatus) {
        *self.status_slot(action).write().unwrap() = Some(status);
        self.touch();
    }
}

impl QueryDisplaySink for WidgetSession {
    fn show_query(&self, text: String) {
        *self.inner.query_display.write().unwrap() = Some(text);
    }
}

/// Thread-safe store for page sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, WidgetSession>>>,
}

impl SessionStore {
    /// Create a new session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session with a random ID and return it.
    #[must_use]
    pub fn create(&self) -> WidgetSession {
        let session = WidgetSession::new(Uuid::new_v4().to_string());
        let mut guard = self.inner.write().unwrap();
        guard.insert(session.id().to_string(), session.clone());
        session
    }

    /// Get a session by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<WidgetSession> {
        self.inner.read().unwrap().get(id).cloned()
    }

    /// Remove a session by ID.
    pub fn remove(&self, id: &str) -> Option<WidgetSession> {
        self.inner.write().unwrap().remove(id)
    }

    /// Get the number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    /// Check if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove sessions that have been inactive longer than the timeout.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let mut guard = self.inner.write().unwrap();
        let before = guard.len();
        guard.retain(|_, session| !session.is_expired_with_timeout(timeout));
        before - guard.len()
    }
}
