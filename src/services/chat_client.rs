use crate::constants::CHAT_FALLBACK_ERROR;
use crate::error::{AppError, Result};
use crate::models::{ChatCompletionRequest, ChatCompletionResponse, ChatConfig, ChatMessage, ChatReply};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, error};

/// Stateless client for the stock-analysis chat assistant
pub struct ChatClient {
    config: ChatConfig,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// Send `message` after the system prompt and `history`.
    ///
    /// Never fails: transport and API errors come back as `ChatReply::Failure`.
    pub async fn chat(&self, message: &str, history: &[ChatMessage]) -> ChatReply {
        let messages = build_messages(&self.config.system_prompt, history, message);
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: &messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(messages = messages.len(), model = %self.config.model, "Sending chat request");

        let response = match self
            .client
            .post(&self.config.api_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Chat API call failed");
                return ChatReply::Failure(CHAT_FALLBACK_ERROR.to_string());
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "Failed to read chat response");
                return ChatReply::Failure(CHAT_FALLBACK_ERROR.to_string());
            }
        };

        if !status.is_success() {
            error!(status = status.as_u16(), "Chat API returned error status");
            return ChatReply::Failure(extract_error_message(&body));
        }

        match serde_json::from_str::<ChatCompletionResponse>(&body) {
            Ok(parsed) => match parsed.choices.into_iter().next() {
                Some(choice) => ChatReply::Success(choice.message.content),
                None => ChatReply::Failure(extract_error_message(&body)),
            },
            Err(e) => {
                error!(error = %e, "Failed to parse chat response");
                ChatReply::Failure(extract_error_message(&body))
            }
        }
    }
}

/// `[system, ...history, user]`
pub fn build_messages(system_prompt: &str, history: &[ChatMessage], message: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend_from_slice(history);
    messages.push(ChatMessage::user(message));
    messages
}

/// `error.message` from an API error body, or the generic fallback
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| CHAT_FALLBACK_ERROR.to_string())
}
