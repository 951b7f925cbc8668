/// Text generation provider abstraction
///
/// The recommendation engine only needs one-shot prompt completion from an
/// external model. Each backend implements this trait; the engine holds a
/// single shared instance built at start-up and treats it as stateless.
use crate::error::AppResult;

pub mod groq;

pub use groq::GroqProvider;

/// A single prompt/response exchange with bounded output
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Instructions framing the assistant's behaviour
    pub system: String,
    /// The user-turn prompt
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Trait for text generation providers
///
/// Implementations must not retry on their own: a failed or slow call is
/// reported once and the caller decides what to do.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextGenerationProvider: Send + Sync {
    /// Sends one completion request and returns the raw reply text
    ///
    /// The reply is untrusted free-form text.
    async fn complete(&self, request: CompletionRequest) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
