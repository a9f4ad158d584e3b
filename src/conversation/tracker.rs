// Conversation tracker for multi-turn chat sessions

use tracing::{debug, info};

use super::types::{Role, Turn};
use crate::errors::GatewayError;
use crate::providers::TextGenerator;

/// Owns the active session and forwards each message to the model gateway
/// with the full session replayed as context.
pub struct ConversationTracker {
    generator: Box<dyn TextGenerator>,
    turns: Vec<Turn>,
}

impl ConversationTracker {
    /// Create a tracker with an empty session
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self {
            generator,
            turns: Vec::new(),
        }
    }

    /// Discard the current session and start fresh
    pub fn reset(&mut self) {
        info!("Starting new session ({} turns discarded)", self.turns.len());
        self.turns.clear();
    }

    /// Send a user message and return the assistant's reply.
    ///
    /// The user turn is appended before the gateway is called and stays in the
    /// history if the call fails; only a successful reply appends the
    /// assistant turn.
    pub async fn send(&mut self, message: &str) -> Result<String, GatewayError> {
        self.turns.push(Turn::user(message));

        let prompt = self.build_prompt();
        debug!(
            "Sending {} turns ({} chars) to {}",
            self.turns.len(),
            prompt.len(),
            self.generator.name()
        );

        let reply = self.generator.generate(&prompt).await?;
        self.turns.push(Turn::assistant(reply.clone()));

        Ok(reply)
    }

    /// Flatten the session into the prompt sent upstream
    pub fn build_prompt(&self) -> String {
        self.turns
            .iter()
            .map(Turn::to_transcript_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The live session, oldest turn first
    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    /// Text of the first user turn, or "" when there is none
    pub fn first_user_message(&self) -> &str {
        self.turns
            .iter()
            .find(|turn| turn.role == Role::User)
            .map(|turn| turn.text.as_str())
            .unwrap_or("")
    }

    /// Text of the most recent assistant turn, or "" when there is none
    pub fn last_assistant_message(&self) -> &str {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role == Role::Assistant)
            .map(|turn| turn.text.as_str())
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of complete exchanges, i.e. user messages that got a reply
    pub fn turn_count(&self) -> usize {
        self.turns
            .iter()
            .filter(|turn| turn.role == Role::Assistant)
            .count()
    }

    /// The gateway this tracker talks to
    pub fn generator(&self) -> &dyn TextGenerator {
        self.generator.as_ref()
    }
}
