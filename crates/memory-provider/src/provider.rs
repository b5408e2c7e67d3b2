//! Memory provider interface.
//!
//! The relay resolves a user handle per request ("get or create"), then asks
//! the handle for a bounded context summary to inject into the system prompt.

use async_trait::async_trait;

/// Backend that stores per-user memory and lazily creates user records.
#[async_trait]
pub trait MemoryProvider: Send + Sync {
    /// Resolves the user with the given id, creating the record if absent.
    ///
    /// Calling twice with the same id yields handles with equivalent
    /// observable `context` behavior.
    async fn get_or_create_user(
        &self,
        user_id: &str,
    ) -> Result<Box<dyn UserHandle>, anyhow::Error>;
}

/// Handle to one user's memory.
#[async_trait]
pub trait UserHandle: Send + Sync + std::fmt::Debug {
    /// The opaque user id this handle was resolved for.
    fn id(&self) -> &str;

    /// Produces a text summary of the user's stored history, no longer than
    /// `max_tokens` implies. A budget of 0 returns a well-formed (possibly
    /// empty) string, never an error. Deterministic for identical stored
    /// state.
    async fn context(&self, max_tokens: usize) -> Result<String, anyhow::Error>;
}
