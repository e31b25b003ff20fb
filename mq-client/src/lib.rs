//! Minimal client for message-queueing middleware.
//!
//! This library provides shared modules for the three binaries:
//! - `mq-drain`: destructively read and remove every message
//! - `mq-queue-util`: depth inquiry and non-destructive browse
//! - `mq-produce`: encode text payloads and enqueue them
//!
//! ## Architecture
//!
//! ```text
//! ConnectionConfig → Session (connect) → QueueHandle (open)
//!                      → drain / browse / depth / produce → report
//! ```
//!
//! Cleanup always runs in reverse order of acquisition: queue handle
//! close, then session disconnect, on every exit path.

pub mod codec;
pub mod config;
pub mod error;
pub mod ops;
pub mod queue;
pub mod report;

// Re-export commonly used types
pub use config::ConnectionConfig;
pub use error::MqError;
pub use queue::{
    AccessMode, GetMode, GetOutcome, Message, PayloadEncoding, QueueHandle, QueueOps, Session,
    FORMAT_STRING,
};
