use serde::{Deserialize, Serialize};

/// Body of a messages call.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateMessageRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<InputMessage>,
}

/// One turn of the conversation history.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InputMessage {
    pub role: String,
    pub content: String,
}

/// Response of a messages call.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MessageResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ContentBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}
