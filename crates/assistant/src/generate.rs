//! One streamed generation round over the transcript.

use marquee_core::{CompletionClient, CompletionRequest, OutputSink, ProviderError};
use tracing::debug;

/// Run one generation round: stream the model's response, forwarding every
/// token to the sink, then commit the assembled text and return it.
///
/// The caller decides what the text *means* (a reply to keep, or a function
/// call to dispatch); this function only moves tokens. The sink sees the
/// raw round output either way, matching the streaming surface the user
/// watches.
pub async fn generate(
    client: &dyn CompletionClient,
    request: CompletionRequest,
    sink: &dyn OutputSink,
) -> Result<String, ProviderError> {
    debug!(
        model = %request.model,
        messages = request.messages.len(),
        "Starting generation round"
    );

    let mut rx = client.stream(request).await?;
    let mut assembled = String::new();

    while let Some(chunk) = rx.recv().await {
        let chunk = chunk?;
        if let Some(content) = chunk.content {
            if !content.is_empty() {
                sink.emit(&content).await;
                assembled.push_str(&content);
            }
        }
        if chunk.done {
            break;
        }
    }

    sink.commit(&assembled).await;
    debug!(chars = assembled.len(), "Generation round complete");
    Ok(assembled)
}
