//! Chat widget core.
//!
//! - [`sinks`]: display surfaces injected into the client
//! - [`actions`]: display-agnostic async actions
//! - [`client`]: [`ChatClient`], which applies actions to the sinks and
//!   discards stale responses

pub mod actions;
pub mod client;
pub mod sinks;

pub use actions::QueryAnswer;
pub use client::{ChatClient, InFlight, InFlightTokens, QueryOutcome};
pub use sinks::{AdminAction, AdminStatus, QueryDisplaySink, StatusSink, StatusTone, TranscriptSink};
