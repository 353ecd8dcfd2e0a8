//! Text-generation collaborator used by the language games.
//!
//! The engine only depends on the [`TextGenerator`] capability: given a system
//! instruction, a user instruction and a maximum length hint, return one completion or
//! fail. Any failure means "generation unavailable now"; the engine applies its own
//! timeout around every call.
//!
//! With the `llm` feature the crate ships [`ChatCompletionsClient`], which talks to any
//! OpenAI-compatible `/chat/completions` endpoint.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("text generation timed out after {0}s")]
    Timeout(u64),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("endpoint returned status {0}")]
    Status(u16),

    #[error("endpoint returned no completion text")]
    EmptyCompletion,
}

/// Capability for producing a single free-text completion.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> Result<String, OracleError>;
}

#[cfg(feature = "llm")]
pub use http::ChatCompletionsClient;

#[cfg(feature = "llm")]
mod http {
    use super::{OracleError, TextGenerator};
    use crate::config::OracleConfig;
    use async_trait::async_trait;
    use log::debug;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize)]
    struct ChatMessage<'a> {
        role: &'a str,
        content: &'a str,
    }

    #[derive(Debug, Serialize)]
    struct ChatRequest<'a> {
        model: &'a str,
        messages: [ChatMessage<'a>; 2],
        temperature: f32,
        max_tokens: u32,
    }

    #[derive(Debug, Deserialize)]
    struct ChatResponse {
        #[serde(default)]
        choices: Vec<ChatChoice>,
    }

    #[derive(Debug, Deserialize)]
    struct ChatChoice {
        message: ChatReply,
    }

    #[derive(Debug, Deserialize)]
    struct ChatReply {
        #[serde(default)]
        content: Option<String>,
    }

    /// Client for an OpenAI-compatible chat-completions endpoint.
    pub struct ChatCompletionsClient {
        client: reqwest::Client,
        endpoint: String,
        api_key: String,
        model: String,
        temperature: f32,
    }

    impl ChatCompletionsClient {
        pub fn new(config: &OracleConfig) -> Self {
            Self {
                client: reqwest::Client::new(),
                endpoint: Self::build_endpoint(&config.base_url),
                api_key: config.api_key.clone(),
                model: config.model.clone(),
                temperature: config.temperature,
            }
        }

        /// `<base_url>/chat/completions`, tolerating a trailing slash.
        pub fn build_endpoint(base_url: &str) -> String {
            format!("{}/chat/completions", base_url.trim_end_matches('/'))
        }

        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }
    }

    #[async_trait]
    impl TextGenerator for ChatCompletionsClient {
        async fn generate(
            &self,
            system_prompt: &str,
            user_prompt: &str,
            max_tokens: u32,
        ) -> Result<String, OracleError> {
            let body = ChatRequest {
                model: &self.model,
                messages: [
                    ChatMessage {
                        role: "system",
                        content: system_prompt,
                    },
                    ChatMessage {
                        role: "user",
                        content: user_prompt,
                    },
                ],
                temperature: self.temperature,
                max_tokens,
            };
            debug!("Requesting completion from {} ({})", self.endpoint, self.model);

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| OracleError::Transport(e.to_string()))?;

            if !response.status().is_success() {
                return Err(OracleError::Status(response.status().as_u16()));
            }

            let parsed: ChatResponse = response
                .json()
                .await
                .map_err(|e| OracleError::Transport(format!("invalid response body: {e}")))?;

            parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty())
                .ok_or(OracleError::EmptyCompletion)
        }
    }

}
