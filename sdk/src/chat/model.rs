use super::api::{ContentBlock, CreateMessageRequest, InputMessage, MessageResponse};
use crate::{client_utils, AnalysisError, AnalysisResult};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

const PROVIDER: &str = "anthropic";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_API_VERSION: &str = "2023-06-01";

const CHAT_MODEL: &str = "claude-sonnet-4-20250514";
const MAX_TOKENS: u32 = 1000;

const SYSTEM_PROMPT: &str = "You are PlantGuard AI, a friendly and expert plant disease assistant. You help farmers and gardeners with:
- Identifying plant diseases from descriptions
- Providing treatment recommendations
- Sharing prevention tips
- Answering questions about plant health, pests, and soil

Keep responses concise, practical, and friendly. Use emojis occasionally to be approachable.
When users describe symptoms, provide a likely diagnosis and actionable advice.
If asked about uploading images for analysis, direct them to the Detect Disease page.";

/// Shown in place of a reply when the conversational service cannot be
/// reached.
pub const FALLBACK_REPLY: &str =
    "I'm having trouble connecting right now. Please try again in a moment. 🌿";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One turn of the assistant conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Client for the plant-health assistant: forwards the conversation history
/// with the fixed system prompt and returns the assistant's reply.
pub struct ChatClient {
    api_key: String,
    base_url: String,
    api_version: String,
    client: Client,
}

#[derive(Clone, Default)]
pub struct ChatClientOptions {
    pub api_key: String,
    pub base_url: Option<String>,
    pub api_version: Option<String>,
    pub client: Option<Client>,
}

impl ChatClient {
    #[must_use]
    pub fn new(options: ChatClientOptions) -> Self {
        let ChatClientOptions {
            api_key,
            base_url,
            api_version,
            client,
        } = options;

        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let api_version = api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let client = client.unwrap_or_default();

        Self {
            api_key,
            base_url,
            api_version,
            client,
        }
    }

    fn request_headers(&self) -> AnalysisResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key).map_err(|error| {
                AnalysisError::InvalidInput(format!("Invalid API key header value: {error}"))
            })?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&self.api_version).map_err(|error| {
                AnalysisError::InvalidInput(format!("Invalid version header value: {error}"))
            })?,
        );

        Ok(headers)
    }

    /// Send the conversation history and return the assistant's reply text.
    pub async fn send(&self, history: &[ChatMessage]) -> AnalysisResult<String> {
        let payload = build_message_request(history);
        let headers = self.request_headers()?;

        let response: MessageResponse = client_utils::send_json(
            &self.client,
            &format!("{}/v1/messages", self.base_url),
            &payload,
            headers,
        )
        .await?;

        extract_reply_text(response)
    }

    /// Like [`send`](Self::send), but converts any failure into the fixed
    /// friendly message instead of surfacing an error.
    pub async fn reply_or_fallback(&self, history: &[ChatMessage]) -> String {
        match self.send(history).await {
            Ok(reply) => reply,
            Err(error) => {
                warn!(%error, "chat request failed");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

fn build_message_request(history: &[ChatMessage]) -> CreateMessageRequest {
    CreateMessageRequest {
        model: CHAT_MODEL.to_string(),
        max_tokens: MAX_TOKENS,
        system: Some(SYSTEM_PROMPT.to_string()),
        messages: history
            .iter()
            .map(|message| InputMessage {
                role: message.role.as_str().to_string(),
                content: message.content.clone(),
            })
            .collect(),
    }
}

fn extract_reply_text(response: MessageResponse) -> AnalysisResult<String> {
    response
        .content
        .into_iter()
        .next()
        .and_then(|block: ContentBlock| block.text)
        .ok_or_else(|| AnalysisError::Invariant(PROVIDER, "no text content in response".to_string()))
}
