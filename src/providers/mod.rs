// Model gateway
//
// A thin abstraction over a hosted text-generation endpoint: one prompt in,
// one block of generated text out. Callers own all conversation state.

use async_trait::async_trait;

use crate::errors::GatewayError;

pub mod background;
pub mod factory;
pub mod gemini;

pub use background::{load_background, with_background};
pub use factory::create_provider;
pub use gemini::GeminiProvider;

/// Trait for text-generation backends
///
/// Implementations are stateless per call apart from immutable configuration
/// (model, credentials, background context).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError>;

    /// Provider name shown to the user (e.g., "Gemini")
    fn name(&self) -> &str;

    /// Model identifier requests are sent to
    fn model(&self) -> &str;
}
