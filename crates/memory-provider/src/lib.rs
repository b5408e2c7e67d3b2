//! # Memory provider
//!
//! Traits for the user-memory service consumed by the chat relay.
//!
//! ## Modules
//!
//! - [`provider`] - `MemoryProvider` and `UserHandle` traits
//! - [`tokens`] - token estimation and budget truncation helpers
//!
//! Implementations live in separate crates: `memory-mock` (fixed-string mock)
//! and `memory-http` (external memobase-style service over HTTP).

pub mod provider;
pub mod tokens;

pub use provider::*;
pub use tokens::*;
