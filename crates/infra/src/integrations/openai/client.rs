/// OpenAI API client for conversational intent extraction
use async_trait::async_trait;
use memora_core::IntentExtractor;
use memora_domain::{
    AssistantConfig, ChatMessage, IntentExtraction, Language, MemoraError, Result,
};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use super::prompts::system_prompt;
use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessagePayload, ExtractorVerdict,
    JsonSchema, ResponseFormat,
};
use crate::http::HttpClient;

const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// OpenAI API client implementing the intent extractor port
pub struct OpenAiIntentExtractor {
    http_client: HttpClient,
    api_key: String,
    model: String,
    api_url: String,
}

impl OpenAiIntentExtractor {
    /// Create a new extractor from the assistant configuration.
    ///
    /// # Errors
    /// Returns `MemoraError::Config` when no API key is configured.
    pub fn new(config: &AssistantConfig, http_client: HttpClient) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| MemoraError::Config("assistant API key not configured".into()))?;

        Ok(Self {
            http_client,
            api_key,
            model: config.model.clone(),
            api_url: config.api_url.clone(),
        })
    }

    /// Build the message list: system prompt, prior history, new message.
    fn build_messages(
        &self,
        message: &str,
        history: &[ChatMessage],
        language: Language,
    ) -> Vec<ChatMessagePayload> {
        let mut messages = Vec::with_capacity(history.len() + 2);

        messages.push(ChatMessagePayload {
            role: "system".to_string(),
            content: system_prompt(language).to_string(),
        });

        for entry in history {
            messages.push(ChatMessagePayload {
                role: entry.role.as_str().to_string(),
                content: entry.content.clone(),
            });
        }

        messages.push(ChatMessagePayload { role: "user".to_string(), content: message.to_string() });

        messages
    }

    /// Call the Chat Completions API and parse the structured verdict.
    async fn call_api(&self, messages: Vec<ChatMessagePayload>) -> Result<ExtractorVerdict> {
        let request_payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            response_format: ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: Some(JsonSchema {
                    name: "intent_extraction".to_string(),
                    schema: json!({
                        "type": "object",
                        "properties": {
                            "reply": { "type": "string" },
                            "is_reminder": { "type": "boolean" },
                            "reminder": {
                                "type": "object",
                                "properties": {
                                    "title": { "type": "string" },
                                    "description": { "type": "string" },
                                    "time_of_day": { "type": "string" },
                                    "relative_day": { "type": "string" }
                                },
                                "required": ["title", "time_of_day", "relative_day"],
                                "additionalProperties": false
                            }
                        },
                        "required": ["reply", "is_reminder"],
                        "additionalProperties": false
                    }),
                    strict: Some(true),
                }),
            },
        };

        let request_builder = self
            .http_client
            .request(Method::POST, &self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_payload);

        let response = self.http_client.send(request_builder).await?;

        let status = response.status();
        debug!(status = status.as_u16(), "received assistant API response");

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(match status.as_u16() {
                401 | 403 => {
                    MemoraError::Config(format!("assistant API key rejected ({status}): {message}"))
                }
                _ => MemoraError::Network(format!("assistant API error ({status}): {message}")),
            });
        }

        let chat_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| MemoraError::Internal(format!("failed to parse assistant response: {e}")))?;

        let choice = chat_response
            .choices
            .first()
            .ok_or_else(|| MemoraError::Internal("assistant response contained no choices".into()))?;

        let verdict: ExtractorVerdict = serde_json::from_str(&choice.message.content).map_err(|e| {
            MemoraError::Internal(format!(
                "failed to parse extractor verdict: {e}. Content: {}",
                choice.message.content
            ))
        })?;

        info!(
            tokens = chat_response.usage.total_tokens,
            prompt_tokens = chat_response.usage.prompt_tokens,
            completion_tokens = chat_response.usage.completion_tokens,
            reminder_intent = verdict.is_reminder,
            "intent extraction complete"
        );

        Ok(verdict)
    }
}

#[async_trait]
impl IntentExtractor for OpenAiIntentExtractor {
    async fn extract(
        &self,
        message: &str,
        history: &[ChatMessage],
        language: Language,
    ) -> Result<IntentExtraction> {
        debug!(history_len = history.len(), ?language, "extracting intent");

        let messages = self.build_messages(message, history, language);
        let verdict = self.call_api(messages).await?;

        // A reminder flag without draft fields is treated as plain chat
        // rather than a broken draft.
        let reminder = if verdict.is_reminder { verdict.reminder } else { None };

        Ok(IntentExtraction { reply_text: verdict.reply, reminder })
    }
}
