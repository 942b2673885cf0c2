//! Ollama chat backend.
//!
//! Talks to the `/api/chat` endpoint of a local or remote Ollama server.
//! Streaming replies arrive as newline-delimited JSON objects, each carrying
//! one fragment of the assistant message.

use async_stream::try_stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::DEFAULT_MODEL;
use crate::error::{LlmError, Result};
use crate::provider::{ChatMessage, ChatModel, ChatRequest, ChatStream};

/// Server used when neither the config nor `OLLAMA_HOST` names one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Ollama chat client.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    /// Server base URL, without a trailing slash.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Model name.
    model: String,
}

impl OllamaClient {
    /// Create a client for `model` on the default server.
    ///
    /// The server address is taken from `OLLAMA_HOST` when set.
    pub fn new(model: impl Into<String>) -> Result<Self> {
        let base_url =
            std::env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(model, base_url)
    }

    /// Create a client for `model` on the server at `base_url`.
    pub fn with_base_url(model: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(LlmError::InvalidConfig("model name is empty".to_string()));
        }

        let base_url = normalize_base_url(&base_url.into())?;
        info!("Using Ollama model {model} at {base_url}");

        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
            model,
        })
    }

    /// Get the server base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn body<'a>(&'a self, request: &'a ChatRequest, stream: bool) -> OllamaChatRequest<'a> {
        OllamaChatRequest {
            model: &self.model,
            messages: &request.messages,
            stream,
            options: request
                .temperature
                .map(|temperature| OllamaOptions { temperature }),
        }
    }

    async fn send(&self, body: &OllamaChatRequest<'_>) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_message(&error_text),
            });
        }

        Ok(response)
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<ChatStream> {
        debug!(
            "Streaming chat with {} messages to model: {}",
            request.messages.len(),
            self.model
        );

        let response = self.send(&self.body(&request, true)).await?;
        Ok(Box::pin(ndjson_fragments(response.bytes_stream())))
    }

    async fn chat(&self, request: ChatRequest) -> Result<String> {
        debug!(
            "Chat with {} messages to model: {}",
            request.messages.len(),
            self.model
        );

        let response = self.send(&self.body(&request, false)).await?;
        let chunk: OllamaChatChunk = response.json().await?;
        if let Some(error) = chunk.error {
            return Err(LlmError::Api {
                status: 200,
                message: error,
            });
        }

        chunk
            .message
            .map(|m| m.content)
            .ok_or_else(|| LlmError::InvalidResponse("reply has no message".to_string()))
    }
}

/// Split a byte stream into NDJSON lines and yield each message fragment.
fn ndjson_fragments<S, B>(bytes: S) -> impl Stream<Item = Result<String>> + Send
where
    S: Stream<Item = reqwest::Result<B>> + Send + 'static,
    B: AsRef<[u8]> + Send,
{
    try_stream! {
        let mut bytes = Box::pin(bytes);
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk?;
            buffer.extend_from_slice(chunk.as_ref());

            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                if let Some(fragment) = parse_line(&line)? {
                    yield fragment;
                }
            }
        }

        if let Some(fragment) = parse_line(&buffer)? {
            yield fragment;
        }
    }
}

/// Parse one NDJSON line. Blank lines and empty fragments yield `None`.
fn parse_line(line: &[u8]) -> Result<Option<String>> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let chunk: OllamaChatChunk = serde_json::from_str(text)?;
    if let Some(error) = chunk.error {
        return Err(LlmError::Api {
            status: 200,
            message: error,
        });
    }

    Ok(chunk
        .message
        .map(|m| m.content)
        .filter(|content| !content.is_empty()))
}

/// Pull the `error` field out of an error body, or return the body itself.
fn error_message(body: &str) -> String {
    serde_json::from_str::<OllamaChatChunk>(body)
        .ok()
        .and_then(|chunk| chunk.error)
        .unwrap_or_else(|| body.trim().to_string())
}

/// Accept `host:port` as well as full URLs, as `OLLAMA_HOST` does.
fn normalize_base_url(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };

    let url = reqwest::Url::parse(&candidate)
        .map_err(|e| LlmError::InvalidConfig(format!("invalid server url {raw:?}: {e}")))?;
    if url.host_str().is_none() {
        return Err(LlmError::InvalidConfig(format!(
            "server url has no host: {raw:?}"
        )));
    }

    Ok(candidate.trim_end_matches('/').to_string())
}

/// Ollama chat request format.
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// One object of an Ollama chat reply.
#[derive(Debug, Deserialize)]
struct OllamaChatChunk {
    #[serde(default)]
    message: Option<OllamaMessage>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}
