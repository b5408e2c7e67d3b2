//! # HTTP memory provider
//!
//! [`MemoryProvider`] implementation backed by an external memobase-style
//! service:
//!
//! - `POST {base}/api/v1/users` with `{"id": ...}` — create-if-absent; a
//!   `409 Conflict` means the user already exists and is treated as success.
//! - `GET {base}/api/v1/users/{id}/context?max_tokens=N` — returns
//!   `{"context": "..."}`.
//!
//! The service is expected to respect the token budget, but the returned
//! text is truncated client-side as well so the invariant holds regardless
//! of what the remote sends back.

use anyhow::{bail, Context as _};
use async_trait::async_trait;
use memory_provider::{truncate_to_tokens, MemoryProvider, UserHandle};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct CreateUserRequest<'a> {
    id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ContextResponse {
    context: String,
}

/// Memory provider speaking HTTP to an external memory service.
#[derive(Debug, Clone)]
pub struct MemobaseHttpClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl MemobaseHttpClient {
    /// Builds a client for the service at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Attaches a bearer credential sent with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }
}

#[async_trait]
impl MemoryProvider for MemobaseHttpClient {
    async fn get_or_create_user(
        &self,
        user_id: &str,
    ) -> Result<Box<dyn UserHandle>, anyhow::Error> {
        let url = format!("{}/api/v1/users", self.base_url);
        debug!(user_id, %url, "Creating user if absent");

        let response = self
            .authorized(self.http.post(&url))
            .json(&CreateUserRequest { id: user_id })
            .send()
            .await
            .context("memory service unreachable")?;

        let status = response.status();
        // 409 means the user already exists; get-or-create semantics.
        if !status.is_success() && status != reqwest::StatusCode::CONFLICT {
            bail!("memory service returned {status} creating user");
        }

        info!(user_id, already_existed = (status == reqwest::StatusCode::CONFLICT), "User resolved");
        Ok(Box::new(HttpUserHandle {
            id: user_id.to_string(),
            client: self.clone(),
        }))
    }
}

/// Handle produced by [`MemobaseHttpClient`]; fetches context lazily.
#[derive(Debug, Clone)]
pub struct HttpUserHandle {
    id: String,
    client: MemobaseHttpClient,
}

#[async_trait]
impl UserHandle for HttpUserHandle {
    fn id(&self) -> &str {
        &self.id
    }

    async fn context(&self, max_tokens: usize) -> Result<String, anyhow::Error> {
        // Nothing fits in a zero budget; skip the round trip.
        if max_tokens == 0 {
            return Ok(String::new());
        }

        let url = format!("{}/api/v1/users/{}/context", self.client.base_url, self.id);
        debug!(user_id = %self.id, max_tokens, %url, "Fetching memory context");

        let response = self
            .client
            .authorized(self.client.http.get(&url))
            .query(&[("max_tokens", max_tokens)])
            .send()
            .await
            .context("memory service unreachable")?;

        let status = response.status();
        if !status.is_success() {
            bail!("memory service returned {status} fetching context");
        }

        let body: ContextResponse = response
            .json()
            .await
            .context("malformed context response from memory service")?;

        let context = truncate_to_tokens(&body.context, max_tokens);
        info!(
            user_id = %self.id,
            max_tokens,
            context_len = context.len(),
            "Memory context resolved"
        );
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let client = MemobaseHttpClient::new("http://memobase.local/");
        assert_eq!(client.base_url, "http://memobase.local");
    }

    #[tokio::test]
    async fn zero_budget_returns_empty_without_network() {
        // Unroutable base URL: the call must still succeed because a zero
        // budget short-circuits before any request is sent.
        let client = MemobaseHttpClient::new("http://127.0.0.1:1");
        let handle = HttpUserHandle {
            id: "U".to_string(),
            client,
        };
        assert_eq!(handle.context(0).await.unwrap(), "");
    }
}
