//! Display-agnostic user actions.
//!
//! Each action is an async function from its input to either the thing to
//! render or the error detail. They touch no display state; the
//! [`ChatClient`](super::ChatClient) applies their results to the sinks.

use serde_json::Value;

use crate::api::{ApiError, Backend};
use crate::render::{pretty_json, render_result};
use crate::widget::sinks::{AdminAction, AdminStatus, StatusTone};

/// What a successful query displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAnswer {
    /// Pretty-printed generated query, when the backend returned one.
    pub query: Option<String>,
    /// Rendered result for the transcript.
    pub body: String,
}

/// Run an admin action and produce its success status line.
pub async fn run_admin(backend: &dyn Backend, action: AdminAction) -> Result<AdminStatus, ApiError> {
    let text = match action {
        AdminAction::Setup => backend.setup().await?.message,
        AdminAction::ImportCsv => {
            let reply = backend.import_csv().await?;
            format!("CSV import completed: {}", reply.imported)
        }
    };
    Ok(AdminStatus::new(text, StatusTone::Success))
}

/// Status line shown when an admin action fails.
pub fn admin_failure(action: AdminAction, err: &ApiError) -> AdminStatus {
    AdminStatus::new(
        format!("{}{err}", action.failure_prefix()),
        StatusTone::Failure,
    )
}

/// Ask the backend a question and render its answer.
pub async fn run_query(backend: &dyn Backend, question: &str) -> Result<QueryAnswer, ApiError> {
    let reply = backend.query(question).await?;
    let query = reply
        .query
        .as_ref()
        .filter(|q| is_truthy(q))
        .map(pretty_json);
    Ok(QueryAnswer {
        query,
        body: render_result(&reply.result),
    })
}

/// Transcript text for a failed query.
///
/// Errors reported by the backend itself are shown verbatim; anything that
/// kept the request from producing a usable reply is reported as a
/// processing failure.
pub fn query_error_text(err: &ApiError) -> String {
    if err.is_application() {
        format!("Error: {err}")
    } else {
        format!("Error processing your question: {err}")
    }
}

/// Whether a `query` value is worth displaying.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
