//! NLQ Chat
//!
//! A chat widget for asking a database questions in plain language. The
//! question is posted to a backend that translates and runs it; the answer
//! is rendered as a table or scalar next to the generated query. Two admin
//! actions seed a sample database and bulk-import CSV files.
//!
//! # Architecture
//!
//! - **Core**: [`widget::ChatClient`] drives injected display sinks and never
//!   touches a real display
//! - **Backend**: [`api::Backend`] seam with a `reqwest` implementation
//! - **Server**: Axum routes binding HTMX controls to the core
//!
//! # Modules
//!
//! - [`api`]: backend contract and HTTP client
//! - [`config`]: layered configuration
//! - [`render`]: result rendering
//! - [`session`]: transcripts and page sessions
//! - [`ui`]: HTML page and fragments
//! - [`widget`]: chat client, actions and sinks

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_async)]

pub mod api;
pub mod config;
pub mod render;
pub mod server;
pub mod session;
pub mod ui;
pub mod widget;

use crate::api::Backend;
use crate::config::AppConfig;

use session::SessionStore;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Query backend the widget talks to.
    pub backend: Arc<dyn Backend>,
    /// Live page sessions.
    pub sessions: SessionStore,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}
