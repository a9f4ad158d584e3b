// tunechat - terminal chat client that collects rated conversations
// Library exports

pub mod cli;
pub mod config;
pub mod conversation;
pub mod errors;
pub mod providers;
pub mod storage;

pub use conversation::{ConversationTracker, Role, Turn};
pub use errors::{GatewayError, StorageError};
pub use providers::TextGenerator;
pub use storage::{open_store, Rating, SaveMode, StorageFormat, TranscriptStore};
