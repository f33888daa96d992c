//! Polling/dispatch core for NestBot.
//!
//! Composes the long-poll event source, the per-user conversation state
//! machine, and the issue-tracker collaborator into one serial loop:
//! fetch, route each event in cursor order, advance the cursor, sleep or
//! back off, repeat.

pub mod backoff;
pub mod dispatch;
pub mod intent_store;
pub mod messages;
pub mod report;
pub mod router;

pub use backoff::*;
pub use dispatch::*;
pub use intent_store::*;
pub use report::*;
pub use router::*;
