//! vita-assistant: the chat-response subsystem for vita
//!
//! This crate turns a stored user history and a new message into a
//! finalized reply: it loads the history, builds a context-aware system
//! prompt, classifies the message intent, calls the completion service,
//! reflows the reply, and decides whether to offer a pre-generated
//! continuation.

pub mod context;
pub mod continuation;
pub mod engine;
pub mod format;
pub mod history;
pub mod intent;
pub mod session;

pub use continuation::{ContinuationPolicy, Language};
pub use engine::Assistant;
pub use history::UserHistory;
pub use intent::Intent;
pub use session::{ChatSession, PendingContinuation};
