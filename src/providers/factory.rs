// Provider factory
//
// Builds the model gateway from resolved configuration

use anyhow::{Context, Result};

use super::background::load_background;
use super::gemini::GeminiProvider;
use super::TextGenerator;
use crate::config::Config;

/// Create the Gemini gateway described by `config`.
///
/// The background file is read here, once, and baked into the provider.
pub fn create_provider(config: &Config) -> Result<Box<dyn TextGenerator>> {
    let background = load_background(&config.background_file)?;
    if !background.is_empty() {
        tracing::info!(
            "Using background context from {} ({} chars)",
            config.background_file.display(),
            background.len()
        );
    }

    let provider = GeminiProvider::with_timeout(config.api_key.clone(), config.request_timeout())
        .context("Failed to create Gemini provider")?
        .with_model(config.model.clone())
        .with_base_url(config.base_url.clone())
        .with_background(background);

    Ok(Box::new(provider))
}
