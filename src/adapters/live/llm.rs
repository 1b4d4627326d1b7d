//! Live adapter for the `LlmClient` port using the Anthropic messages API.

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::PortError;
use crate::ports::llm::{ChunkSender, CompletionRequest, CompletionResponse, LlmClient, LlmFuture};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Live LLM client that calls the Anthropic Claude API.
pub struct LiveLlmClient {
    client: Client,
    api_key: Option<String>,
}

impl LiveLlmClient {
    /// Creates a live LLM client using the configured API key.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self { client: Client::new(), api_key: config.anthropic_api_key.clone() }
    }
}

/// Request body sent to the Anthropic messages API.
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

/// A single message in the Anthropic API request.
#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Top-level response from the Anthropic messages API.
#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

/// A content block in the Anthropic response.
#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// Token usage reported by the Anthropic API.
#[derive(Deserialize, Default)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

/// Error response from the Anthropic API.
#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

/// Detail inside an Anthropic error response.
#[derive(Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

/// One server-sent event from a streamed completion. Only the fields we
/// read are modelled.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    MessageStart { message: StreamMessage },
    ContentBlockDelta { delta: StreamDelta },
    MessageDelta { usage: Usage },
    Error { error: AnthropicErrorDetail },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct StreamMessage {
    #[serde(default)]
    usage: Usage,
}

#[derive(Deserialize)]
struct StreamDelta {
    #[serde(default)]
    text: Option<String>,
}

/// Accumulates a streamed completion from SSE `data:` lines.
#[derive(Default)]
struct StreamState {
    pending: String,
    text: String,
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl StreamState {
    /// Feed raw bytes; complete lines are parsed, any tail is kept for later.
    fn push(&mut self, bytes: &[u8], chunks: &ChunkSender) -> Result<(), PortError> {
        self.pending.push_str(&String::from_utf8_lossy(bytes));
        while let Some(newline) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=newline).collect();
            self.line(line.trim_end(), chunks)?;
        }
        Ok(())
    }

    fn line(&mut self, line: &str, chunks: &ChunkSender) -> Result<(), PortError> {
        let Some(data) = line.strip_prefix("data:") else {
            return Ok(());
        };
        let Ok(event) = serde_json::from_str::<StreamEvent>(data.trim()) else {
            tracing::debug!(line, "skipping unparseable stream event");
            return Ok(());
        };
        match event {
            StreamEvent::MessageStart { message } => {
                self.prompt_tokens = message.usage.input_tokens;
            }
            StreamEvent::ContentBlockDelta { delta } => {
                if let Some(text) = delta.text {
                    // A dropped receiver just means nobody is watching.
                    let _ = chunks.send(text.clone());
                    self.text.push_str(&text);
                }
            }
            StreamEvent::MessageDelta { usage } => self.completion_tokens = usage.output_tokens,
            StreamEvent::Error { error } => {
                return Err(format!("Anthropic stream error: {}", error.message).into());
            }
            StreamEvent::Other => {}
        }
        Ok(())
    }

    fn finish(mut self, chunks: &ChunkSender) -> Result<CompletionResponse, PortError> {
        let tail = std::mem::take(&mut self.pending);
        self.line(tail.trim_end(), chunks)?;
        Ok(CompletionResponse {
            text: self.text,
            prompt_tokens: self.prompt_tokens,
            completion_tokens: self.completion_tokens,
        })
    }
}

async fn read_streamed(
    mut response: Response,
    chunks: &ChunkSender,
) -> Result<CompletionResponse, PortError> {
    let mut state = StreamState::default();
    while let Some(bytes) = response
        .chunk()
        .await
        .map_err(|e| format!("Failed to read Anthropic stream: {e}"))?
    {
        state.push(&bytes, chunks)?;
    }
    state.finish(chunks)
}

impl LiveLlmClient {
    async fn send(
        &self,
        request: CompletionRequest,
        chunks: Option<ChunkSender>,
    ) -> Result<CompletionResponse, PortError> {
        let api_key =
            self.api_key.as_deref().ok_or("ANTHROPIC_API_KEY environment variable not set")?;

        let body = AnthropicRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            system: request.system.as_deref(),
            messages: vec![AnthropicMessage { role: "user", content: &request.prompt }],
            stream: chunks.is_some(),
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Anthropic API request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let response_text = response.text().await.unwrap_or_default();
            let msg = serde_json::from_str::<AnthropicError>(&response_text)
                .map(|e| e.error.message)
                .unwrap_or(response_text);
            return Err(format!("Anthropic API error ({}): {msg}", status.as_u16()).into());
        }

        if let Some(chunks) = &chunks {
            return read_streamed(response, chunks).await;
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| format!("Failed to read Anthropic API response: {e}"))?;
        let api_response: AnthropicResponse = serde_json::from_str(&response_text)
            .map_err(|e| format!("Failed to parse Anthropic API response: {e}"))?;

        let text = api_response.content.into_iter().map(|block| block.text).collect::<String>();

        Ok(CompletionResponse {
            text,
            prompt_tokens: api_response.usage.input_tokens,
            completion_tokens: api_response.usage.output_tokens,
        })
    }
}

impl LlmClient for LiveLlmClient {
    fn complete(&self, request: &CompletionRequest, chunks: Option<ChunkSender>) -> LlmFuture<'_> {
        Box::pin(self.send(request.clone(), chunks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_state_assembles_split_events() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut state = StreamState::default();

        state
            .push(
                b"event: message_start\ndata: {\"type\":\"message_start\",\
                  \"message\":{\"usage\":{\"input_tokens\":12}}}\n\n",
                &tx,
            )
            .unwrap();
        state
            .push(b"data: {\"type\":\"content_block_delta\",\"delta\":{\"text\":\"| Met", &tx)
            .unwrap();
        state.push(b"ric |\"}}\n", &tx).unwrap();
        state
            .push(
                b"data: {\"type\":\"content_block_delta\",\"delta\":{\"text\":\" Target |\"}}\n",
                &tx,
            )
            .unwrap();
        state
            .push(b"data: {\"type\":\"message_delta\",\"usage\":{\"output_tokens\":7}}\n", &tx)
            .unwrap();

        let response = state.finish(&tx).unwrap();
        assert_eq!(response.text, "| Metric | Target |");
        assert_eq!(response.prompt_tokens, 12);
        assert_eq!(response.completion_tokens, 7);
        assert_eq!(rx.try_recv().unwrap(), "| Metric |");
        assert_eq!(rx.try_recv().unwrap(), " Target |");
    }

    #[test]
    fn stream_error_event_fails() {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let mut state = StreamState::default();
        let err = state
            .push(b"data: {\"type\":\"error\",\"error\":{\"message\":\"Overloaded\"}}\n", &tx)
            .unwrap_err();
        assert!(err.to_string().contains("Overloaded"));
    }

    #[tokio::test]
    async fn missing_api_key_is_reported() {
        let client = LiveLlmClient::from_config(&AppConfig::default());
        let request = CompletionRequest {
            model: "claude-sonnet-4-20250514".into(),
            system: None,
            prompt: "hi".into(),
            max_tokens: 8,
        };
        let err = client.complete(&request, None).await.unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }
}
