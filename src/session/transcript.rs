//! Chat transcript and its messages.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::render::{TABLE_OPEN, escape_html};
use crate::widget::sinks::TranscriptSink;

/// Text of the transient message shown while a query is in flight.
pub const PLACEHOLDER_TEXT: &str = "Processing your question...";

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Opaque, time-derived message identifier.
///
/// Two ids minted within the same millisecond still differ thanks to a
/// process-wide sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    /// Mint a fresh id.
    #[must_use]
    pub fn next() -> Self {
        let millis = Utc::now().timestamp_millis();
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("msg-{millis}-{seq}"))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who a message is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// The user's own question.
    User,
    /// Results and the processing placeholder.
    System,
    /// Failures.
    Error,
}

impl MessageKind {
    /// CSS class and display name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::System => "system",
            Self::Error => "error",
        }
    }
}

/// A single transcript entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a message with a fresh id.
    pub fn new(text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            id: MessageId::next(),
            text: text.into(),
            kind,
            created_at: Utc::now(),
        }
    }

    /// A question typed by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::User)
    }

    /// An answer or status message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::System)
    }

    /// An error message.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::Error)
    }

    /// Processing placeholder for an in-flight query.
    pub fn placeholder() -> Self {
        Self::system(PLACEHOLDER_TEXT)
    }

    /// Whether the text is inserted as markup rather than escaped text.
    ///
    /// Only internally generated tables qualify; the user's own input never
    /// does.
    pub fn is_markup(&self) -> bool {
        self.kind != MessageKind::User && self.text.starts_with(TABLE_OPEN)
    }

    /// Render as an HTML element.
    pub fn to_html(&self) -> String {
        let body = if self.is_markup() {
            self.text.clone()
        } else {
            escape_html(&self.text)
        };
        format!(
            r#"<div class="message {kind}" id="{id}">{body}</div>"#,
            kind = self.kind.as_str(),
            id = escape_html(self.id.as_str()),
        )
    }
}

/// Ordered list of messages for one page.
///
/// Cheap to clone; clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all messages in insertion order.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.messages.read().unwrap().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.read().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render every message, in order.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.messages
            .read()
            .unwrap()
            .iter()
            .map(Message::to_html)
            .collect()
    }
}

impl TranscriptSink for Transcript {
    fn append(&self, message: Message) {
        self.messages.write().unwrap().push(message);
    }

    fn remove(&self, id: &MessageId) -> bool {
        let mut guard = self.messages.write().unwrap();
        let before = guard.len();
        guard.retain(|m| &m.id != id);
        guard.len() != before
    }
}
