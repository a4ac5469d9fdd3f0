//! Full-page HTML.

use crate::render::escape_html;
use crate::session::WidgetSession;
use crate::ui::fragments;
use crate::widget::AdminAction;

/// Generate the HTML shell for the application.
fn html_shell(title: &str, htmx_src: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Ask your database questions in plain language">
    <title>{title} - NLQ Chat</title>
    <script src="{htmx_src}"></script>
    <style>
        body {{ font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem; }}
        .admin {{ display: flex; gap: 1rem; margin-bottom: 1rem; }}
        .admin section {{ flex: 1; }}
        .status {{ margin-top: .5rem; padding: .5rem; border-radius: 4px; min-height: 1.2em; }}
        .status-working {{ background: #e0f7fa; }}
        .status-success {{ background: #e8f5e9; }}
        .status-failure {{ background: #ffebee; }}
        #chat-messages {{ height: 420px; overflow-y: auto; border: 1px solid #ddd; padding: .5rem; }}
        .message {{ margin: .4rem 0; padding: .5rem .75rem; border-radius: 6px; white-space: pre-wrap; }}
        .message.user {{ background: #e3f2fd; margin-left: 20%; }}
        .message.system {{ background: #f5f5f5; margin-right: 20%; }}
        .message.error {{ background: #ffebee; color: #b71c1c; }}
        .message table {{ border-collapse: collapse; white-space: normal; }}
        .message th, .message td {{ border: 1px solid #ccc; padding: .25rem .5rem; }}
        #query-form {{ display: flex; gap: .5rem; margin-top: .5rem; }}
        #user-input {{ flex: 1; padding: .5rem; }}
        #query-display {{ background: #263238; color: #eceff1; padding: .75rem; min-height: 2em; }}
    </style>
</head>
<body>
{content}
</body>
</html>"#
    )
}

/// Admin button bound to its endpoint. The working text is shown locally
/// the moment the request leaves; the response replaces the whole line.
fn admin_section(session_id: &str, action: AdminAction, label: &str, status: &str) -> String {
    let target = fragments::status_element_id(action);
    format!(
        r##"<section>
        <button id="{button_id}" type="button"
            hx-post="/widget/{session_id}/{route}"
            hx-target="#{target}"
            hx-swap="outerHTML"
            hx-on--before-request="const s = document.getElementById('{target}'); s.textContent = '{working}'; s.className = 'status status-working';">{label}</button>
        {status}
    </section>"##,
        button_id = if action == AdminAction::Setup { "setup-db" } else { "import-csv" },
        route = action.as_str(),
        working = action.working_text(),
    )
}

/// Render the chat widget page for a session.
///
/// While a query is in flight the transcript is re-fetched once so the
/// placeholder shows. The query reply is the final word: once it lands, any
/// transcript fetch still pending is aborted.
pub fn widget_page(session: &WidgetSession, htmx_src: &str) -> String {
    let session_id = escape_html(session.id());
    let setup_status = fragments::status_line(
        AdminAction::Setup,
        session.status(AdminAction::Setup).as_ref(),
    );
    let import_status = fragments::status_line(
        AdminAction::ImportCsv,
        session.status(AdminAction::ImportCsv).as_ref(),
    );

    let content = format!(
        r##"<h1>Database Chat</h1>
<div class="admin">
    {setup}
    {import}
</div>
<div id="chat-messages"
    hx-get="/widget/{session_id}/transcript"
    hx-trigger="submit from:#query-form delay:150ms"
    hx-sync="this:replace">{transcript}</div>
<form id="query-form"
    hx-post="/widget/{session_id}/query"
    hx-target="#chat-messages"
    hx-swap="innerHTML scroll:bottom"
    hx-on--before-request="this.reset()"
    hx-on--after-request="htmx.trigger('#chat-messages', 'htmx:abort')">
    <input id="user-input" name="question" type="text" autocomplete="off" placeholder="Ask a question about your data...">
    <button id="send-button" type="submit">Send</button>
</form>
<h2>Generated query</h2>
{query}"##,
        setup = admin_section(&session_id, AdminAction::Setup, "Setup Sample Database", &setup_status),
        import = admin_section(&session_id, AdminAction::ImportCsv, "Import CSV Files", &import_status),
        transcript = session.transcript().to_html(),
        query = fragments::query_display(session.query_display().as_deref(), false),
    );

    html_shell("Chat", &escape_html(htmx_src), &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;

    #[test]
    fn test_page_binds_session_routes() {
        let session = SessionStore::new().create();
        let html = widget_page(&session, "/static/htmx.min.js");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<script src="/static/htmx.min.js"></script>"#));
        assert!(html.contains(&format!(r#"hx-post="/widget/{}/query""#, session.id())));
        assert!(html.contains(&format!(r#"hx-post="/widget/{}/setup""#, session.id())));
        assert!(html.contains(&format!(r#"hx-post="/widget/{}/import""#, session.id())));
        assert!(html.contains(r#"id="setup-message""#));
        assert!(html.contains(r#"id="import-message""#));
        assert!(html.contains(r#"<pre id="query-display"></pre>"#));
    }

    #[test]
    fn test_page_shows_working_text() {
        let session = SessionStore::new().create();
        let html = widget_page(&session, "/htmx.js");
        assert!(html.contains("Setting up sample database..."));
        assert!(html.contains("Importing CSV files from /csv ..."));
    }

    #[test]
    fn test_query_form_clears_input_on_submit() {
        let session = SessionStore::new().create();
        let html = widget_page(&session, "/htmx.js");
        assert!(html.contains(r#"hx-on--before-request="this.reset()""#));
        assert!(!html.contains(r#"hx-on--after-request="this.reset()""#));
    }

    #[test]
    fn test_query_reply_aborts_pending_transcript_fetch() {
        let session = SessionStore::new().create();
        let html = widget_page(&session, "/htmx.js");
        assert!(html.contains(r#"hx-trigger="submit from:#query-form delay:150ms""#));
        assert!(html.contains(r#"hx-on--after-request="htmx.trigger('#chat-messages', 'htmx:abort')""#));
    }
}
