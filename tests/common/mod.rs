// Shared test helpers

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tunechat::{GatewayError, TextGenerator};

/// Gateway double that returns queued replies in order and records prompts.
/// A queued `None` fails that call.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Option<String>>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGenerator {
    pub fn new(replies: &[&str]) -> Self {
        Self::with_outcomes(replies.iter().map(|r| Some(*r)).collect())
    }

    pub fn with_outcomes(outcomes: Vec<Option<&str>>) -> Self {
        Self {
            replies: Mutex::new(outcomes.into_iter().map(|o| o.map(str::to_string)).collect()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Some(reply)) => Ok(reply),
            _ => Err(GatewayError::EmptyResponse {
                provider: "Scripted".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "Scripted"
    }

    fn model(&self) -> &str {
        "scripted-1"
    }
}
