//! Gemini API client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::GeminiConfig;

use super::TextGenerator;
use super::error::{ApiErrorResponse, GeminiError};
use super::types::{GenerateContentRequest, GenerateContentResponse, GenerationConfig};

const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_OUTPUT_TOKENS: u32 = 512;
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Google Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    model: String,
    url: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError::InvalidConfig` if the API key is not a valid
    /// header value, or `GeminiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| GeminiError::InvalidConfig("API key is not a valid header".to_string()))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                model: config.model.clone(),
                url: generate_content_url(&config.endpoint, &config.model),
            }),
        })
    }

    /// Get the model ID this client calls.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(self.handle_error_status(status, response).await)
        }
    }

    async fn handle_error_status(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GeminiError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return GeminiError::RateLimited(retry_after);
        }

        match response.text().await {
            Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_error) => GeminiError::Api {
                    status: api_error
                        .error
                        .status
                        .unwrap_or_else(|| status.to_string()),
                    message: api_error.error.message,
                },
                Err(_) => GeminiError::Api {
                    status: status.to_string(),
                    message: body,
                },
            },
            Err(e) => GeminiError::Http(e),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.inner.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let mut request = GenerateContentRequest::from_prompt(prompt);
        request.generation_config = Some(GenerationConfig {
            temperature: None,
            max_output_tokens: Some(MAX_OUTPUT_TOKENS),
        });

        let response = self
            .inner
            .client
            .post(&self.inner.url)
            .json(&request)
            .send()
            .await?;

        Ok(self.handle_response(response).await?.text())
    }
}

fn generate_content_url(endpoint: &str, model: &str) -> String {
    format!(
        "{}/models/{model}:generateContent",
        endpoint.trim_end_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;
    use crate::config::{DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL};

    #[test]
    fn test_generate_content_url() {
        assert_eq!(
            generate_content_url(DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(
            generate_content_url("http://localhost:9000/", "m"),
            "http://localhost:9000/models/m:generateContent"
        );
    }

    #[test]
    fn test_new_rejects_unprintable_key() {
        let config = GeminiConfig {
            api_key: SecretString::from("bad\nkey"),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            timeout: Duration::from_secs(5),
        };

        assert!(matches!(
            GeminiClient::new(&config),
            Err(GeminiError::InvalidConfig(_))
        ));
    }
}
