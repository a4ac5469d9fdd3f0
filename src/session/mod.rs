//! Page sessions and chat transcripts.
//!
//! Every loaded widget page owns one [`WidgetSession`]: its transcript,
//! the two admin status lines and the generated-query pane. Sessions are
//! identified by UUID and live in memory only.
//!
//! # Architecture
//!
//! - [`Message`]: a single, immutable transcript entry
//! - [`Transcript`]: ordered message list with placeholder removal
//! - [`WidgetSession`]: the display surfaces of one page
//! - [`SessionStore`]: thread-safe store for all live pages
//!
//! # Example
//!
//! ```rust
//! use nlq_chat::session::{Message, SessionStore};
//! use nlq_chat::widget::TranscriptSink;
//!
//! let store = SessionStore::new();
//! let session = store.create();
//! session.append(Message::user("How many customers are there?"));
//!
//! assert_eq!(session.transcript().len(), 1);
//! ```

mod store;
mod transcript;

pub use store::{SessionStore, WidgetSession};
pub use transcript::{Message, MessageId, MessageKind, PLACEHOLDER_TEXT, Transcript};
