//! Transport-only chat completion client primitives.
//!
//! This crate owns request building, SSE parsing, and transport errors for
//! OpenAI-compatible chat-completions endpoints. The general-assistant and
//! web-search providers are two [`config::ProviderKind`] configurations of
//! the same wire contract; both return an incremental text stream.
//!
//! No retry logic lives here: every failure surfaces to the caller exactly
//! once, with the provider's status and diagnostic body.

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod payload;
pub mod sse;
pub mod url;

pub use client::ChatClient;
pub use config::{ChatApiConfig, ProviderKind};
pub use error::ChatApiError;
pub use events::ChatStreamEvent;
pub use payload::{ChatMessage, ChatRequest};
pub use sse::SseStreamParser;
pub use url::normalize_chat_url;
