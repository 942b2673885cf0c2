//! Chat model abstraction.

use std::pin::Pin;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A lazily produced reply, one text fragment at a time.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Request for a chat completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    /// Conversation to complete.
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature (provider default when unset).
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Create a request from a list of messages.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: None,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Trait for chat model backends.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Stream the reply to a request.
    async fn chat_stream(&self, request: ChatRequest) -> Result<ChatStream>;

    /// Get the whole reply to a request.
    async fn chat(&self, request: ChatRequest) -> Result<String> {
        // Default implementation: drain the stream
        let mut stream = self.chat_stream(request).await?;
        let mut reply = String::new();
        while let Some(fragment) = stream.next().await {
            reply.push_str(&fragment?);
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use pretty_assertions::assert_eq;

    struct Canned(Vec<&'static str>);

    #[async_trait]
    impl ChatModel for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        fn model(&self) -> &str {
            "test"
        }

        async fn chat_stream(&self, _request: ChatRequest) -> Result<ChatStream> {
            let fragments: Vec<Result<String>> =
                self.0.iter().map(|s| Ok((*s).to_string())).collect();
            Ok(Box::pin(stream::iter(fragments)))
        }
    }

    #[test]
    fn test_message_roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "system", "content": "hi"}));
    }

    #[test]
    fn test_request_builder() {
        let request = ChatRequest::new(vec![ChatMessage::user("hello")]).with_temperature(0.1);
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.temperature, Some(0.1));
    }

    #[tokio::test]
    async fn test_default_chat_joins_fragments() {
        let model = Canned(vec!["Hel", "lo", " world"]);
        let reply = model.chat(ChatRequest::default()).await.unwrap();
        assert_eq!(reply, "Hello world");
    }
}
