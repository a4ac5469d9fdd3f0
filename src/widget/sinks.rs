//! Rendering surfaces the chat client writes to.
//!
//! The client never touches a display directly; it is handed one sink per
//! surface, so the same logic drives the served page and the tests.


use crate::session::{Message, MessageId};

/// One of the two administrative actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminAction {
    /// Seed the sample database.
    Setup,
    /// Bulk-import CSV files.
    ImportCsv,
}

impl AdminAction {
    /// Status text shown while the request is in flight.
    pub fn working_text(self) -> &'static str {
        match self {
            Self::Setup => "Setting up sample database...",
            Self::ImportCsv => "Importing CSV files from /csv ...",
        }
    }

    /// Prefix of the status text on failure.
    pub fn failure_prefix(self) -> &'static str {
        match self {
            Self::Setup => "Failed to setup database: ",
            Self::ImportCsv => "Failed to import CSV: ",
        }
    }

    /// Stable identifier used for element ids and routes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::ImportCsv => "import",
        }
    }
}

/// Styling of an admin status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    /// Request in flight.
    Working,
    /// Last request succeeded.
    Success,
    /// Last request failed.
    Failure,
}

impl StatusTone {
    /// CSS class for this tone.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Working => "status-working",
            Self::Success => "status-success",
            Self::Failure => "status-failure",
        }
    }
}

/// The single displayed line of an admin action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminStatus {
    /// Displayed text.
    pub text: String,
    /// Styling.
    pub tone: StatusTone,
}

impl AdminStatus {
    /// Create a status line.
    pub fn new(text: impl Into<String>, tone: StatusTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Append-only message list with placeholder removal.
pub trait TranscriptSink: Send + Sync {
    /// Append a message at the end.
    fn append(&self, message: Message);

    /// Remove a message by id. Returns `false` if it was not present.
    fn remove(&self, id: &MessageId) -> bool;
}

/// Status lines of the admin actions.
pub trait StatusSink: Send + Sync {
    /// Overwrite the status line of `action`.
    fn set_status(&self, action: AdminAction, status: AdminStatus);
}

/// Pane showing the most recent generated database query.
pub trait QueryDisplaySink: Send + Sync {
    /// Overwrite the displayed query text.
    fn show_query(&self, text: String);
}
