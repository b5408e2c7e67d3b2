//! Server configuration, loaded once from environment variables at startup
//! into an immutable struct. Nothing else reads the environment.

use std::env;
use std::time::Duration;

use chat_relay::RelayConfig;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 10000;

/// Everything the server needs, resolved at boot. Required chat settings may
/// be absent here; the relay reports them per request.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub static_user_id: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub openai_base_url: Option<String>,
    pub port: u16,
    /// Explicit CORS origin list; `None` means permissive.
    pub allowed_origins: Option<Vec<String>>,
    /// External memory service; `None` selects the mock provider.
    pub memobase_url: Option<String>,
    pub memobase_api_key: Option<String>,
    pub memory_max_tokens: usize,
    pub max_duration: Duration,
}

impl ServerConfig {
    /// Loads configuration from the environment. `port_override` (from the
    /// CLI) wins over `PORT`; an unparsable `PORT` falls back to the default
    /// with a warning rather than refusing to boot.
    pub fn load(port_override: Option<u16>) -> Self {
        let port = port_override.unwrap_or_else(|| match env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(port = %raw, "Invalid PORT value, using default {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        });

        let allowed_origins = non_empty(env::var("ALLOWED_ORIGINS").ok()).map(|raw| {
            raw.split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect()
        });

        let memory_max_tokens = env::var("MEMORY_MAX_TOKENS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(chat_relay::config::DEFAULT_CONTEXT_MAX_TOKENS);

        let max_duration = env::var("MAX_DURATION_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(chat_relay::config::DEFAULT_MAX_DURATION);

        Self {
            static_user_id: non_empty(env::var("STATIC_USER_ID").ok()),
            openai_api_key: non_empty(env::var("OPENAI_API_KEY").ok()),
            openai_model: non_empty(env::var("OPENAI_MODEL").ok()),
            openai_base_url: non_empty(env::var("OPENAI_BASE_URL").ok()),
            port,
            allowed_origins,
            memobase_url: non_empty(env::var("MEMOBASE_URL").ok()),
            memobase_api_key: non_empty(env::var("MEMOBASE_API_KEY").ok()),
            memory_max_tokens,
            max_duration,
        }
    }

    /// The relay's view of this configuration.
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            static_user_id: self.static_user_id.clone(),
            model: self.openai_model.clone(),
            api_key: self.openai_api_key.clone(),
            context_max_tokens: self.memory_max_tokens,
            max_duration: self.max_duration,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
