//! Replaying adapter for the `LlmClient` port.

use super::{next_output, replay_result, SharedReplayer};
use crate::error::PortError;
use crate::ports::{ChunkSender, CompletionRequest, CompletionResponse, LlmClient, LlmFuture};

/// Serves recorded LLM completions from a cassette.
///
/// A streaming caller receives the whole recorded text as a single chunk.
pub struct ReplayingLlmClient {
    replayer: Option<SharedReplayer>,
}

impl ReplayingLlmClient {
    /// Create a replaying LLM client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer: Some(replayer) }
    }

    /// Create a replaying LLM client with no cassette. Panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }
}

impl LlmClient for ReplayingLlmClient {
    fn complete(&self, _request: &CompletionRequest, chunks: Option<ChunkSender>) -> LlmFuture<'_> {
        let output = next_output(self.replayer.as_ref(), "llm", "complete");
        Box::pin(async move {
            let response: CompletionResponse = replay_result(output)?;
            if let Some(tx) = chunks {
                let _ = tx.send(response.text.clone());
            }
            Ok::<_, PortError>(response)
        })
    }
}
