//! Provider wiring: builds the relay from configuration.
//!
//! Memory provider selection is configuration, not code: `MEMOBASE_URL` set
//! means the HTTP-backed provider, unset means the mock. The completion
//! client is always OpenAI (optionally against a custom base URL); a missing
//! credential is caught by relay validation before the client is ever used.

use std::sync::Arc;

use chat_relay::ChatRelay;
use completion_client::{CompletionClient, OpenAICompletionClient};
use memory_http::MemobaseHttpClient;
use memory_mock::MockMemoryClient;
use memory_provider::MemoryProvider;
use tracing::info;

use crate::config::ServerConfig;

/// Builds the fully wired relay from server configuration.
pub fn build_relay(config: &ServerConfig) -> Arc<ChatRelay> {
    let memory: Arc<dyn MemoryProvider> = match &config.memobase_url {
        Some(url) => {
            info!(memobase_url = %url, "Using HTTP memory provider");
            let mut client = MemobaseHttpClient::new(url.clone());
            if let Some(key) = &config.memobase_api_key {
                client = client.with_api_key(key.clone());
            }
            Arc::new(client)
        }
        None => {
            info!("MEMOBASE_URL not set, using mock memory provider");
            Arc::new(MockMemoryClient::new())
        }
    };

    let api_key = config.openai_api_key.clone().unwrap_or_default();
    let completion: Arc<dyn CompletionClient> = match &config.openai_base_url {
        Some(base_url) => Arc::new(OpenAICompletionClient::with_base_url(
            api_key,
            base_url.clone(),
        )),
        None => Arc::new(OpenAICompletionClient::new(api_key)),
    };

    Arc::new(ChatRelay::new(config.relay_config(), memory, completion))
}
