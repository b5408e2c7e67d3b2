//! # Chat relay
//!
//! The core of the service: takes an inbound chat request, validates the
//! required configuration, resolves memory context for the configured user,
//! and relays a streaming completion back to the caller chunk by chunk.
//!
//! ## Modules
//!
//! - [`config`] - immutable relay configuration and validation
//! - [`error`] - the error taxonomy surfaced to callers
//! - [`relay`] - `ChatRelay` and the returned `ChatStream`
//!
//! The relay is stateless across requests; the only shared state is the
//! read-only [`RelayConfig`] and the provider handles it was constructed with.

pub mod config;
pub mod error;
pub mod relay;

pub use config::RelayConfig;
pub use error::{RelayError, Stage};
pub use relay::{build_system_prompt, ChatRelay, ChatStream};
