//! Telegram long-poll transport for NestBot.
//!
//! Wraps the Bot API `getUpdates`/`sendMessage`/`answerCallbackQuery` calls
//! behind the [`ChatTransport`] seam consumed by the dispatch loop, and maps
//! raw updates into the domain event model ([`InboundEvent`]).

pub mod chat_transport;
pub mod telegram_client;
pub mod update_types;

pub use chat_transport::*;
pub use telegram_client::*;
pub use update_types::*;
