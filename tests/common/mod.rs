//! Shared test utilities.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use nlq_chat::api::{ApiError, Backend, ImportResponse, QueryResult, SetupResponse};
use nlq_chat::session::{Message, MessageId};
use nlq_chat::widget::{AdminAction, AdminStatus, QueryDisplaySink, StatusSink, TranscriptSink};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::oneshot;

// =============================================================================
// Scripted backend
// =============================================================================

/// Canned reply of the fake backend.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Successful JSON body.
    Json(Value),
    /// Application error reported by the backend.
    AppError(&'static str),
    /// Non-JSON body.
    Html(&'static str),
}

impl Scripted {
    fn into_result<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            Self::Json(v) => Ok(serde_json::from_value(v)?),
            Self::AppError(message) => Err(ApiError::Application {
                status: 500,
                message: message.to_string(),
            }),
            Self::Html(body) => Err(ApiError::protocol_mismatch(502, body)),
        }
    }
}

#[derive(Debug)]
struct Step {
    gate: Option<oneshot::Receiver<()>>,
    reply: Scripted,
}

/// In-memory [`Backend`] replaying scripted replies in order.
#[derive(Debug, Default)]
pub struct FakeBackend {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
    questions: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply returned immediately.
    pub fn push(&self, reply: Scripted) {
        self.steps.lock().unwrap().push_back(Step { gate: None, reply });
    }

    /// Queue a reply held back until the returned sender fires.
    pub fn push_gated(&self, reply: Scripted) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.steps.lock().unwrap().push_back(Step {
            gate: Some(rx),
            reply,
        });
        tx
    }

    /// Number of backend calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Questions received by the query endpoint.
    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }

    /// Yield until at least `n` calls have started.
    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }

    async fn next<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted backend call");
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = step.gate {
            let _ = gate.await;
        }
        step.reply.into_result()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn setup(&self) -> Result<SetupResponse, ApiError> {
        self.next().await
    }

    async fn import_csv(&self) -> Result<ImportResponse, ApiError> {
        self.next().await
    }

    async fn query(&self, question: &str) -> Result<QueryResult, ApiError> {
        self.questions.lock().unwrap().push(question.to_string());
        self.next().await
    }
}

// =============================================================================
// Recording sinks
// =============================================================================

/// Every call made on a sink, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Append(Message),
    Remove(MessageId, bool),
    Status(AdminAction, AdminStatus),
    Query(String),
}

/// Sinks that record calls and keep a plain transcript.
#[derive(Debug, Default)]
pub struct RecordingSinks {
    events: Mutex<Vec<SinkEvent>>,
    messages: Mutex<Vec<Message>>,
}

impl RecordingSinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }
}

impl TranscriptSink for RecordingSinks {
    fn append(&self, message: Message) {
        self.messages.lock().unwrap().push(message.clone());
        self.events.lock().unwrap().push(SinkEvent::Append(message));
    }

    fn remove(&self, id: &MessageId) -> bool {
        let mut messages = self.messages.lock().unwrap();
        let before = messages.len();
        messages.retain(|m| &m.id != id);
        let removed = messages.len() != before;
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Remove(id.clone(), removed));
        removed
    }
}

impl StatusSink for RecordingSinks {
    fn set_status(&self, action: AdminAction, status: AdminStatus) {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Status(action, status));
    }
}

impl QueryDisplaySink for RecordingSinks {
    fn show_query(&self, text: String) {
        self.events.lock().unwrap().push(SinkEvent::Query(text));
    }
}

// =============================================================================
// HTTP fixtures
// =============================================================================

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_http(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    format!("http://{addr}")
}

/// A local URL nothing listens on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}
