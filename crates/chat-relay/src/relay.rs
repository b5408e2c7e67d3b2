//! The relay itself: validate, resolve context, stream.
//!
//! A relay call moves through Validating → ResolvingContext → Streaming.
//! Failures before the first chunk surface as `Err` from [`ChatRelay::handle`];
//! once chunks have been relayed they stand, and a later fault arrives as a
//! terminal `Err` item on the stream before it closes.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use chat_types::ChatRequest;
use completion_client::{CompletionClient, CompletionRequest, StreamChunk};
use futures::Stream;
use memory_provider::MemoryProvider;
use tokio::sync::mpsc;
use tokio::time::{timeout_at, Instant};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info};

use crate::config::RelayConfig;
use crate::error::{RelayError, Stage};

/// Fixed prefix of the system prompt; the resolved memory context follows.
pub const SYSTEM_PROMPT_PREFIX: &str = "You're Memobase Assistant. Use the memory below:\n";

/// Interpolates the memory context into the fixed system prompt template.
pub fn build_system_prompt(context: &str) -> String {
    format!("{SYSTEM_PROMPT_PREFIX}{context}")
}

/// Bounded relay channel; downstream backpressure pauses upstream consumption.
const CHANNEL_CAPACITY: usize = 32;

/// Stateless chat relay. One instance serves all requests concurrently; it
/// holds only read-only config and the two provider handles.
pub struct ChatRelay {
    config: RelayConfig,
    memory: Arc<dyn MemoryProvider>,
    completion: Arc<dyn CompletionClient>,
}

impl ChatRelay {
    pub fn new(
        config: RelayConfig,
        memory: Arc<dyn MemoryProvider>,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            config,
            memory,
            completion,
        }
    }

    /// Runs one chat request through the relay.
    ///
    /// On success the returned [`ChatStream`] yields completion chunks in
    /// upstream order. The whole call (context resolution plus streaming) is
    /// bounded by the configured maximum duration. Dropping the stream stops
    /// upstream consumption.
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatStream, RelayError> {
        // Validating: no provider is contacted unless every required setting
        // is present.
        let settings = self.config.validated()?;
        let user_id = settings.user_id.to_string();
        let model = settings.model.to_string();
        let seconds = self.config.max_duration.as_secs();
        let deadline = Instant::now() + self.config.max_duration;

        // ResolvingContext: get-or-create, then bounded context fetch. The
        // completion provider is never invoked if this fails.
        let budget = self.config.context_max_tokens;
        let context = timeout_at(deadline, async {
            let user = self.memory.get_or_create_user(&user_id).await?;
            user.context(budget).await
        })
        .await
        .map_err(|_| RelayError::Timeout { seconds })?
        .map_err(|cause| RelayError::Dependency {
            stage: Stage::Memory,
            cause,
        })?;

        info!(
            user_id = %user_id,
            context_len = context.len(),
            "Memory context resolved"
        );

        let completion_request = CompletionRequest {
            model,
            system: build_system_prompt(&context),
            messages: request.messages,
            tools: request.tools.unwrap_or_default(),
        };

        // Streaming: a producer task forwards chunks into a bounded channel
        // consumed by the caller. The channel is the cancellation point: when
        // the receiver is dropped, the next send fails and the producer stops
        // consuming upstream.
        let (tx, mut rx) = mpsc::channel::<Result<String, RelayError>>(CHANNEL_CAPACITY);
        let completion = Arc::clone(&self.completion);
        tokio::spawn(async move {
            let chunk_tx = tx.clone();
            let mut forward = move |chunk: StreamChunk| -> Pin<
                Box<dyn std::future::Future<Output = anyhow::Result<()>> + Send>,
            > {
                let tx = chunk_tx.clone();
                Box::pin(async move {
                    tx.send(Ok(chunk.content))
                        .await
                        .map_err(|_| anyhow::anyhow!("output channel closed"))
                })
            };

            match timeout_at(
                deadline,
                completion.stream_completion(completion_request, &mut forward),
            )
            .await
            {
                Ok(Ok(full)) => {
                    info!(user_id = %user_id, response_len = full.len(), "Completion stream finished");
                }
                Ok(Err(cause)) => {
                    if tx.is_closed() {
                        debug!(user_id = %user_id, "Caller disconnected, upstream consumption stopped");
                    } else {
                        error!(user_id = %user_id, error = %cause, "Completion stream failed");
                        let _ = tx
                            .send(Err(RelayError::Dependency {
                                stage: Stage::Completion,
                                cause,
                            }))
                            .await;
                    }
                }
                Err(_) => {
                    error!(user_id = %user_id, seconds, "Completion stream timed out");
                    let _ = tx.send(Err(RelayError::Timeout { seconds })).await;
                }
            }
            // tx drops here, closing the stream.
        });

        // Hold the response until the first event so that a failure before
        // any byte was relayed becomes a structured error, not a broken 200.
        match rx.recv().await {
            Some(Err(err)) => Err(err),
            first => Ok(ChatStream {
                first,
                inner: ReceiverStream::new(rx),
            }),
        }
    }
}

/// Ordered stream of completion chunks produced by [`ChatRelay::handle`].
///
/// Yields each chunk as `Ok(text)`; a mid-stream fault is the final `Err`
/// item. Chunk order mirrors the upstream completion exactly.
#[derive(Debug)]
pub struct ChatStream {
    first: Option<Result<String, RelayError>>,
    inner: ReceiverStream<Result<String, RelayError>>,
}

impl Stream for ChatStream {
    type Item = Result<String, RelayError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if let Some(item) = this.first.take() {
            return Poll::Ready(Some(item));
        }
        Pin::new(&mut this.inner).poll_next(cx)
    }
}
