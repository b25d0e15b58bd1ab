//! Completion backend implementations for Marquee.
//!
//! One implementation covers the field: most chat-completion services
//! expose an OpenAI-compatible `/chat/completions` endpoint, streaming
//! included. Function calling does not go through the API's tool surface;
//! the instruction prompt makes the model embed calls as JSON in text.

pub mod openai;

pub use openai::OpenAiCompatClient;

use marquee_config::AppConfig;
use marquee_core::error::ProviderError;
use std::sync::Arc;

/// Build the completion client from configuration.
pub fn build_from_config(
    config: &AppConfig,
) -> Result<Arc<dyn marquee_core::CompletionClient>, ProviderError> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        ProviderError::NotConfigured(
            "No API key set (MARQUEE_API_KEY or OPENAI_API_KEY)".into(),
        )
    })?;

    Ok(Arc::new(OpenAiCompatClient::new(
        "openai",
        &config.api_url,
        api_key,
    )))
}
