//! Recording adapter for the `LlmClient` port.

use super::record_result;
use crate::cassette::session::SharedRecorder;
use crate::ports::{ChunkSender, CompletionRequest, LlmClient, LlmFuture};

/// Records LLM completions while delegating to an inner implementation.
///
/// Streamed chunks pass straight through; only the final response is kept.
pub struct RecordingLlmClient {
    inner: Box<dyn LlmClient>,
    recorder: SharedRecorder,
}

impl RecordingLlmClient {
    /// Creates a new recording LLM client wrapping the given implementation.
    pub fn new(inner: Box<dyn LlmClient>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl LlmClient for RecordingLlmClient {
    fn complete(&self, request: &CompletionRequest, chunks: Option<ChunkSender>) -> LlmFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.complete(&request, chunks).await;
            record_result(&self.recorder, "llm", "complete", &request, &result);
            result
        })
    }
}
