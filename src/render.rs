//! Result rendering.
//!
//! Turns the `result` value of a query reply into the text shown in the
//! transcript: an HTML table for lists of documents, `Result: n` for counts,
//! and pretty-printed JSON for everything else.

use std::collections::HashSet;
use std::fmt::Write as _;

use serde_json::{Map, Value};

/// Literal prefix marking a message as internally generated table markup.
pub const TABLE_OPEN: &str = "<table>";

/// Text shown for an empty result list.
pub const NO_RESULTS: &str = "No results found for your query.";

/// Render a query result for display.
///
/// # Example
///
/// ```rust
/// use nlq_chat::render::render_result;
/// use serde_json::json;
///
/// assert_eq!(render_result(&json!(42)), "Result: 42");
/// assert_eq!(render_result(&json!([])), "No results found for your query.");
/// ```
pub fn render_result(value: &Value) -> String {
    match value {
        Value::Array(items) if items.is_empty() => NO_RESULTS.to_string(),
        Value::Array(items) => match as_rows(items) {
            Some(rows) => render_table(&rows),
            None => pretty_json(value),
        },
        Value::Number(n) => format!("Result: {n}"),
        _ => pretty_json(value),
    }
}

/// Pretty-print JSON with two-space indentation.
pub fn pretty_json(value: &Value) -> String {
    // Serializing a Value cannot fail; fall back to compact form regardless.
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Escape text for safe inclusion in HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Rows of a tabular result, or `None` if any element is not an object or
/// no row carries a key.
fn as_rows(items: &[Value]) -> Option<Vec<&Map<String, Value>>> {
    let rows: Vec<_> = items.iter().map(Value::as_object).collect::<Option<_>>()?;
    rows.iter().any(|row| !row.is_empty()).then_some(rows)
}

/// Union of keys across rows, in first-seen order.
fn columns<'a>(rows: &[&'a Map<String, Value>]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for row in rows {
        for key in row.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key.as_str());
            }
        }
    }
    columns
}

fn render_table(rows: &[&Map<String, Value>]) -> String {
    let columns = columns(rows);

    let mut table = String::from(TABLE_OPEN);
    table.push_str("<tr>");
    for key in &columns {
        let _ = write!(table, "<th>{}</th>", escape_html(key));
    }
    table.push_str("</tr>");

    for row in rows {
        table.push_str("<tr>");
        for key in &columns {
            let cell = row.get(*key).map(cell_text).unwrap_or_default();
            let _ = write!(table, "<td>{}</td>", escape_html(&cell));
        }
        table.push_str("</tr>");
    }

    table.push_str("</table>");
    table
}

/// Inline text of a single cell: strings raw, everything else as compact JSON.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
