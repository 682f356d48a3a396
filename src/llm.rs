use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OpenAiConfig;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("chat request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chat API returned {status}: {body}")]
    Api { status: reqwest::StatusCode, body: String },
    #[error("could not parse chat response: {0}")]
    Parse(String),
    #[error("chat response contained no content")]
    Empty,
}

/// A chat-completion backend: one system instruction, one user message.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, LlmError>;
}

/// Chat completions against an Azure OpenAI deployment.
pub struct AzureChatClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl AzureChatClient {
    pub fn new(client: reqwest::Client, config: &OpenAiConfig) -> Self {
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            config.endpoint.trim_end_matches('/'),
            config.deployment,
            config.api_version
        );
        Self { client, url, api_key: config.api_key.clone() }
    }
}

#[async_trait]
impl ChatClient for AzureChatClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let request = ChatRequest {
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature,
        };

        debug!(subject = %user, temperature, "requesting chat completion");

        let resp = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let body = resp.text().await?;
        first_choice_content(&body)
    }
}

fn first_choice_content(body: &str) -> Result<String, LlmError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Parse(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(LlmError::Empty)
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
