/// Groq chat-completions provider
///
/// Groq exposes an OpenAI-compatible API:
/// POST {api_url}/chat/completions with a bearer token, returning
/// `choices[0].message.content`.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage},
    services::providers::{CompletionRequest, TextGenerationProvider},
};

#[derive(Clone)]
pub struct GroqProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GroqProvider {
    /// Creates the provider with one pooled HTTP client reused for every call
    ///
    /// `timeout` bounds the whole request at the transport level as well.
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_url)
    }

    fn build_body(&self, request: CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(request.system),
                ChatMessage::user(request.prompt),
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[async_trait::async_trait]
impl TextGenerationProvider for GroqProvider {
    async fn complete(&self, request: CompletionRequest) -> AppResult<String> {
        let body = self.build_body(request);

        let response = self
            .http_client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Groq API returned status {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;

        let content = completion
            .first_content()
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| AppError::ExternalApi("Groq returned an empty completion".to_string()))?;

        tracing::debug!(
            model = %self.model,
            reply_len = content.len(),
            "Groq completion received"
        );

        Ok(content.to_string())
    }

    fn name(&self) -> &'static str {
        "groq"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GroqProvider {
        GroqProvider::new(
            "gsk_test".to_string(),
            "https://api.groq.com/openai/v1/".to_string(),
            "llama-3.1-8b-instant".to_string(),
            Duration::from_secs(10),
        )
        .unwrap()
    }

    #[test]
    fn test_completions_url_strips_trailing_slash() {
        assert_eq!(
            provider().completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_build_body_carries_sampling_settings() {
        let body = provider().build_body(CompletionRequest {
            system: "be brief".to_string(),
            prompt: "recommend".to_string(),
            max_tokens: 150,
            temperature: 0.7,
        });

        assert_eq!(body.model, "llama-3.1-8b-instant");
        assert_eq!(body.messages, vec![ChatMessage::system("be brief"), ChatMessage::user("recommend")]);
        assert_eq!(body.max_tokens, 150);
        assert!((body.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let provider = GroqProvider::new(
            "gsk_test".to_string(),
            "http://127.0.0.1:9".to_string(),
            "llama-3.1-8b-instant".to_string(),
            Duration::from_millis(500),
        )
        .unwrap();

        let result = provider
            .complete(CompletionRequest {
                system: String::new(),
                prompt: String::new(),
                max_tokens: 10,
                temperature: 0.7,
            })
            .await;

        assert!(result.is_err());
    }
}
