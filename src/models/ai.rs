use serde::{Deserialize, Serialize};

// ========== Chat Completion wire types (OpenAI-compatible) ==========

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.to_string()),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    pub choices: Vec<ChatChoice>,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    /// Present in non-streaming responses.
    pub message: Option<ChatChoiceMessage>,
    /// Present in streaming chunks.
    pub delta: Option<ChatDelta>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoiceMessage {
    pub role: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatDelta {
    pub role: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Event emitted on the streaming narrative channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeStreamEvent {
    /// "content" | "done" | "error"
    pub event_type: String,
    pub content: Option<String>,
    pub done: bool,
    pub usage: Option<TokenUsage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_skips_unset_options() {
        let req = ChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::user("hello")],
            max_tokens: None,
            temperature: None,
            stream: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("max_tokens"));
        assert!(!json.contains("stream"));
        assert!(json.contains("\"role\":\"user\""));
    }

    #[test]
    fn test_parse_streaming_chunk() {
        let data = r#"{"id":"c1","choices":[{"index":0,"delta":{"content":"Risk"},"finish_reason":null}],"usage":null}"#;
        let chunk: ChatCompletionResponse = serde_json::from_str(data).unwrap();
        let delta = chunk.choices[0].delta.as_ref().unwrap();
        assert_eq!(delta.content.as_deref(), Some("Risk"));
        assert!(chunk.choices[0].message.is_none());
    }

    #[test]
    fn test_parse_blocking_response() {
        let data = r#"{"id":"c2","choices":[{"index":0,"message":{"role":"assistant","content":"done"},"finish_reason":"stop"}],"usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}"#;
        let resp: ChatCompletionResponse = serde_json::from_str(data).unwrap();
        let msg = resp.choices[0].message.as_ref().unwrap();
        assert_eq!(msg.content.as_deref(), Some("done"));
        assert_eq!(resp.usage.unwrap().total_tokens, 15);
    }
}
