//! Free-form text generation for messages outside the ordering rules.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cafebot_server::gemini::{GeminiClient, TextGenerator};
//!
//! let client = GeminiClient::new(&config)?;
//! let reply = client.generate("Say hello to the customer").await?;
//! ```

mod client;
mod error;
pub mod prompt;
pub mod types;

pub use client::GeminiClient;
pub use error::{ApiError, ApiErrorResponse, GeminiError};
pub use prompt::build_prompt;

use async_trait::async_trait;

/// Something that turns a prompt into a reply.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply. An empty string is a valid, if unhelpful, reply.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError` if the reply could not be produced.
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError>;
}

/// Generator used when no API key is configured. Always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGenerator;

#[async_trait]
impl TextGenerator for UnconfiguredGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GeminiError> {
        Err(GeminiError::NotConfigured)
    }
}
