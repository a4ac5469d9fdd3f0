//! Server-rendered HTML for the widget.
//!
//! The page is HTML-first: HTMX binds each control to a widget route and
//! swaps the returned fragment in place. No client bundle is involved.
//!
//! - [`page`]: the full widget page for a session
//! - [`fragments`]: status lines, transcript and query pane fragments

pub mod fragments;
pub mod page;

pub use page::widget_page;
