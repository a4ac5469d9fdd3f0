//! HTML fragments swapped into the page by HTMX.

use crate::render::escape_html;
use crate::session::WidgetSession;
use crate::widget::{AdminAction, AdminStatus};

/// Element id of an admin action's status line.
pub fn status_element_id(action: AdminAction) -> String {
    format!("{}-message", action.as_str())
}

/// Status line of an admin action. Empty until the action first runs.
pub fn status_line(action: AdminAction, status: Option<&AdminStatus>) -> String {
    let id = status_element_id(action);
    match status {
        Some(status) => format!(
            r#"<div id="{id}" class="status {class}">{text}</div>"#,
            class = status.tone.css_class(),
            text = escape_html(&status.text),
        ),
        None => format!(r#"<div id="{id}" class="status"></div>"#),
    }
}

/// The generated-query pane. `oob` marks it for an out-of-band swap.
pub fn query_display(text: Option<&str>, oob: bool) -> String {
    let oob = if oob { r#" hx-swap-oob="true""# } else { "" };
    format!(
        r#"<pre id="query-display"{oob}>{}</pre>"#,
        escape_html(text.unwrap_or_default())
    )
}

/// Reply to a query submission: the whole transcript plus the query pane.
pub fn query_reply(session: &WidgetSession) -> String {
    let mut html = session.transcript().to_html();
    html.push_str(&query_display(session.query_display().as_deref(), true));
    html
}
