// Conversation state for the active chat session
//
// A session is a flat, ordered list of turns. Every prompt sent upstream is
// the whole session replayed as "role: text" lines, which keeps the
// representation transport-agnostic and easy to export as training data.

pub mod tracker;
pub mod types;

pub use tracker::ConversationTracker;
pub use types::{Role, Turn};
