//! # OpenAI API client
//!
//! Thin wrapper around [async-openai] for streaming chat completion.
//! Provides token masking for safe logging and a simple request API taking
//! messages plus optional tool definitions.
//!
//! Each upstream delta is forwarded to the caller's callback immediately and
//! in order; this crate never accumulates chunks across delta boundaries.

use async_openai::{types::CreateChatCompletionRequestArgs, Client};
use futures::StreamExt;

pub use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolArgs, ChatCompletionToolType, FunctionObjectArgs,
};

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If the token has 11 or fewer chars, returns "***" to avoid leaking any part of it.
/// Counts chars, not bytes, so multi-byte tokens never split a character.
pub fn mask_token(token: &str) -> String {
    let len = token.chars().count();
    if len <= 11 {
        return "***".to_string();
    }
    let head: String = token.chars().take(7).collect();
    let tail: String = token.chars().skip(len - 4).collect();
    format!("{}***{}", head, tail)
}

/// A chunk of streamed completion content and whether the stream is finished.
#[derive(Debug, Clone)]
pub struct StreamChunk {
    /// Delta text for this chunk, exactly as the model produced it.
    pub content: String,
    /// True if this is the final chunk for the response.
    pub done: bool,
}

/// OpenAI chat client. Wraps async-openai; holds the API key only for masked logging.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Client<async_openai::config::OpenAIConfig>,
    api_key_for_logging: Option<String>,
}

impl OpenAIClient {
    /// Builds a client using the given API key and default API base URL.
    pub fn new(api_key: String) -> Self {
        let api_key_for_logging = Some(api_key.clone());
        let config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            api_key_for_logging,
        }
    }

    /// Builds a client with a custom base URL (proxies, compatible endpoints).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let api_key_for_logging = Some(api_key.clone());
        let config = async_openai::config::OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Client::with_config(config),
            api_key_for_logging,
        }
    }

    /// Streams chat completion, invoking `callback` once per upstream delta,
    /// in arrival order. Returns the full concatenated response text.
    ///
    /// A callback error aborts the stream and is propagated, which is how a
    /// disconnected consumer stops upstream consumption.
    pub async fn chat_completion_stream<F, Fut>(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
        tools: Vec<ChatCompletionTool>,
        mut callback: F,
    ) -> anyhow::Result<String>
    where
        F: FnMut(StreamChunk) -> Fut,
        Fut: std::future::Future<Output = anyhow::Result<()>>,
    {
        let masked = self
            .api_key_for_logging
            .as_deref()
            .map(mask_token)
            .unwrap_or_else(|| "***".to_string());

        tracing::info!(
            model = %model,
            message_count = messages.len(),
            tool_count = tools.len(),
            api_key = %masked,
            "OpenAI chat_completion_stream request"
        );

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(model).messages(messages);
        if !tools.is_empty() {
            args.tools(tools);
        }
        let request = args.build()?;

        let mut stream = self.client.chat().create_stream(request).await?;

        let mut full_response = String::new();
        while let Some(result) = stream.next().await {
            match result {
                Ok(chunk) => {
                    // Usage arrives on the last chunk when the API sends it.
                    if let Some(ref u) = chunk.usage {
                        tracing::info!(
                            prompt_tokens = u.prompt_tokens,
                            completion_tokens = u.completion_tokens,
                            total_tokens = u.total_tokens,
                            "OpenAI chat_completion_stream usage"
                        );
                    }
                    if let Some(choice) = chunk.choices.first() {
                        let done = choice.finish_reason.is_some();
                        if let Some(content) = &choice.delta.content {
                            if !content.is_empty() {
                                full_response.push_str(content);
                                callback(StreamChunk {
                                    content: content.clone(),
                                    done,
                                })
                                .await?;
                            }
                        }
                    }
                }
                Err(e) => {
                    anyhow::bail!("Stream error: {}", e);
                }
            }
        }

        Ok(full_response)
    }
}
