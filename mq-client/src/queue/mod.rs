//! Queue-access layer: transport session, queue handle and message types.
//!
//! Acquisition is scoped: a [`QueueHandle`] never outlives its
//! [`Session`], and cleanup always runs close-then-disconnect, both
//! best-effort.

pub mod handle;
#[cfg(test)]
pub mod memory;
pub mod session;
pub mod types;

pub use handle::{AccessMode, GetMode, QueueHandle, QueueOps};
pub use session::Session;
pub use types::{GetOutcome, Message, PayloadEncoding, FORMAT_STRING};
