//! # Completion client abstraction
//!
//! Defines the [`CompletionClient`] trait and an OpenAI implementation.
//! Transport-agnostic; the chat relay streams through this seam, and tests
//! substitute fakes.
//!
//! The stream method uses a boxed callback so that [`CompletionClient`] is
//! object-safe (dyn compatible).

use anyhow::Result;
use async_trait::async_trait;
use chat_types::{Message, Role, ToolDefinition};
use openai_client::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolArgs, ChatCompletionToolType, FunctionObjectArgs,
};
use std::future::Future;
use std::pin::Pin;

mod openai_impl;

pub use openai_impl::OpenAICompletionClient;

/// A chunk of streamed completion output; aligned with `openai_client::StreamChunk`.
#[derive(Debug, Clone)]
pub struct StreamChunk {
    pub content: String,
    pub done: bool,
}

/// One streaming completion call: model, system prompt, caller messages,
/// caller tool definitions.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
}

/// Type-erased callback for stream chunks so that [`CompletionClient`] is dyn compatible.
pub type StreamChunkCallback =
    dyn FnMut(StreamChunk) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send;

/// Completion client interface: streamed chat completion from a prepared request.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Streamed completion: invokes `callback` once per chunk, in order, and
    /// returns the full reply text. A callback error aborts the stream.
    async fn stream_completion(
        &self,
        request: CompletionRequest,
        callback: &mut StreamChunkCallback,
    ) -> Result<String>;
}

/// Converts a single [`Message`] into OpenAI API message format.
fn message_to_openai(msg: &Message) -> Result<ChatCompletionRequestMessage> {
    let content = msg.content.clone();
    let openai_msg: ChatCompletionRequestMessage = match msg.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    };
    Ok(openai_msg)
}

/// Converts a [`ToolDefinition`] into an OpenAI function tool.
fn tool_to_openai(tool: &ToolDefinition) -> Result<ChatCompletionTool> {
    let mut function = FunctionObjectArgs::default();
    function
        .name(tool.name.clone())
        .parameters(tool.parameters.clone());
    if let Some(description) = &tool.description {
        function.description(description.clone());
    }
    let openai_tool = ChatCompletionToolArgs::default()
        .r#type(ChatCompletionToolType::Function)
        .function(function.build()?)
        .build()?;
    Ok(openai_tool)
}
