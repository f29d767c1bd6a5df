//! OpenAI-backed generative provider for the free-form fallback path.
//!
//! Uses [`async_openai`] for type-safe request/response handling. Replies
//! are deliberately small and conservative: low temperature, a tight
//! output cap, one system preamble plus one user message per call.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use secrecy::{ExposeSecret, SecretString};

use lumen_core::generative::GenerativeProvider;
use lumen_types::error::GenerativeError;

/// Output cap for supportive replies.
const MAX_COMPLETION_TOKENS: u32 = 300;

/// Low temperature keeps the tone steady across turns.
const TEMPERATURE: f32 = 0.4;

/// OpenAI chat-completions provider.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key
/// stored inside the `async_openai::Client`.
pub struct OpenAiGenerative {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiGenerative {
    /// Create a provider for the given API key and model.
    pub fn new(api_key: &SecretString, model: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key.expose_secret());
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    fn build_request(&self, system: &str, user_text: &str) -> CreateChatCompletionRequest {
        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(system.to_string()),
                name: None,
            }),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(user_text.to_string()),
                name: None,
            }),
        ];

        CreateChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_completion_tokens: Some(MAX_COMPLETION_TOKENS),
            temperature: Some(TEMPERATURE),
            ..Default::default()
        }
    }
}

impl GenerativeProvider for OpenAiGenerative {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, system: &str, user_text: &str) -> Result<String, GenerativeError> {
        let request = self.build_request(system, user_text);

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(GenerativeError::EmptyCompletion);
        }
        Ok(content)
    }
}

/// Map an `async_openai::error::OpenAIError` to a [`GenerativeError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> GenerativeError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "authentication_error" || error_type == "authentication_error" {
                GenerativeError::Authentication
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_exceeded" {
                GenerativeError::RateLimited
            } else {
                GenerativeError::Request(api_err.message.clone())
            }
        }
        other => GenerativeError::Request(other.to_string()),
    }
}
