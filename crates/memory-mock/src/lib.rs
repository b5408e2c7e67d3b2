//! # Mock memory provider
//!
//! In-process implementation of [`MemoryProvider`] that returns a fixed
//! context string for any user. Used in tests and for local development
//! wiring when no external memory service is configured.
//!
//! The mock ignores the token budget; the fixed string is far below any
//! realistic budget anyway. "Get or create" is a no-op: every id resolves
//! to a handle immediately and nothing is stored.

use async_trait::async_trait;
use memory_provider::{MemoryProvider, UserHandle};
use tracing::info;

/// Memory provider returning a fixed context string for every user.
#[derive(Debug, Clone, Default)]
pub struct MockMemoryClient;

impl MockMemoryClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MemoryProvider for MockMemoryClient {
    async fn get_or_create_user(
        &self,
        user_id: &str,
    ) -> Result<Box<dyn UserHandle>, anyhow::Error> {
        Ok(Box::new(MockUser {
            id: user_id.to_string(),
        }))
    }
}

/// Handle produced by [`MockMemoryClient`].
#[derive(Debug, Clone)]
pub struct MockUser {
    id: String,
}

#[async_trait]
impl UserHandle for MockUser {
    fn id(&self) -> &str {
        &self.id
    }

    async fn context(&self, max_tokens: usize) -> Result<String, anyhow::Error> {
        info!(
            user_id = %self.id,
            max_tokens,
            "Generating mock memory context"
        );
        Ok(format!("This is mock memory context for user {}.", self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn context_returns_fixed_string_for_user() {
        let client = MockMemoryClient::new();
        let user = client.get_or_create_user("U").await.unwrap();
        assert_eq!(user.id(), "U");
        assert_eq!(
            user.context(750).await.unwrap(),
            "This is mock memory context for user U."
        );
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let client = MockMemoryClient::new();
        let first = client.get_or_create_user("alice").await.unwrap();
        let second = client.get_or_create_user("alice").await.unwrap();
        assert_eq!(
            first.context(100).await.unwrap(),
            second.context(100).await.unwrap()
        );
    }

    #[tokio::test]
    async fn zero_budget_still_returns_well_formed_string() {
        let client = MockMemoryClient::new();
        let user = client.get_or_create_user("U").await.unwrap();
        // The mock ignores the budget; the call must not fault.
        let context = user.context(0).await.unwrap();
        assert!(!context.is_empty());
    }
}
