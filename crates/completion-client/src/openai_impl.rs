//! OpenAI implementation of [`CompletionClient`]: wraps openai-client,
//! prepends the system message, and forwards tool definitions.

use anyhow::Result;
use async_trait::async_trait;
use openai_client::StreamChunk as OpenAIStreamChunk;
use tracing::instrument;

use super::{
    message_to_openai, tool_to_openai, CompletionClient, CompletionRequest, StreamChunk,
    StreamChunkCallback,
};

/// Completion client backed by the OpenAI Chat Completions API.
#[derive(Clone)]
pub struct OpenAICompletionClient {
    client: openai_client::OpenAIClient,
}

impl OpenAICompletionClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::new(api_key),
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::with_base_url(api_key, base_url),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAICompletionClient {
    #[instrument(skip(self, request, callback), fields(model = %request.model))]
    async fn stream_completion(
        &self,
        request: CompletionRequest,
        callback: &mut StreamChunkCallback,
    ) -> Result<String> {
        let mut openai_messages: Vec<openai_client::ChatCompletionRequestMessage> = vec![
            openai_client::ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system.clone())
                .build()?
                .into(),
        ];
        for msg in &request.messages {
            openai_messages.push(message_to_openai(msg)?);
        }
        let tools = request
            .tools
            .iter()
            .map(tool_to_openai)
            .collect::<Result<Vec<_>>>()?;

        self.client
            .chat_completion_stream(
                &request.model,
                openai_messages,
                tools,
                |chunk: OpenAIStreamChunk| {
                    callback(StreamChunk {
                        content: chunk.content,
                        done: chunk.done,
                    })
                },
            )
            .await
    }
}
