//! Wire types for the backend endpoints.
//!
//! Only the fields the widget relies on are modelled; anything else the
//! backend sends is ignored by serde.

use serde::{Deserialize, Serialize};

// =============================================================================
// Query API Types
// =============================================================================

/// Body of `POST /api/query`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    /// The user's natural-language question.
    pub question: String,
}

/// Successful reply from `POST /api/query`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResult {
    /// The generated database query, shown for transparency.
    #[serde(default)]
    pub query: Option<serde_json::Value>,
    /// The query result: a list of documents, a count, or an aggregate.
    pub result: serde_json::Value,
    /// Echo of the question, when the backend includes it.
    #[serde(default)]
    pub question: Option<String>,
}

// =============================================================================
// Admin API Types
// =============================================================================

/// Successful reply from `POST /api/setup`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetupResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// Successful reply from `POST /api/import-csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportResponse {
    /// Per-collection import summary, displayed verbatim.
    #[serde(default)]
    pub imported: serde_json::Value,
}

/// Failure envelope shared by every endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Error detail. Usually a string, but any non-null value counts.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    /// Diagnostic payload (e.g. the raw LLM response).
    #[serde(default)]
    pub debug: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Display text of the `error` field: strings as-is, anything else as
    /// compact JSON. `None` when the field is absent or null.
    pub fn detail(&self) -> Option<String> {
        match self.error.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_result_ignores_unknown_fields() {
        let body = json!({
            "query": {"collection": "products", "operation": "count", "filter": {}},
            "result": 8,
            "question": "how many products?",
            "elapsed_ms": 12
        });
        let parsed: QueryResult = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.result, json!(8));
        assert_eq!(parsed.question.as_deref(), Some("how many products?"));
        assert!(parsed.query.is_some());
    }

    #[test]
    fn test_query_request_shape() {
        let req = QueryRequest {
            question: "list customers".into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"question": "list customers"})
        );
    }

    #[test]
    fn test_error_body_tolerates_missing_error() {
        let parsed: ErrorBody = serde_json::from_value(json!({"detail": "x"})).unwrap();
        assert!(parsed.detail().is_none());
    }

    #[test]
    fn test_error_body_detail() {
        let parsed: ErrorBody = serde_json::from_value(json!({"error": "No question provided"})).unwrap();
        assert_eq!(parsed.detail().as_deref(), Some("No question provided"));

        let parsed: ErrorBody =
            serde_json::from_value(json!({"error": {"code": 11000, "msg": "duplicate key"}})).unwrap();
        assert_eq!(parsed.detail().as_deref(), Some(r#"{"code":11000,"msg":"duplicate key"}"#));

        let parsed: ErrorBody = serde_json::from_value(json!({"error": null})).unwrap();
        assert!(parsed.detail().is_none());
    }
}
