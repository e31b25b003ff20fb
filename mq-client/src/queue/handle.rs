//! Queue handle: one open queue under a session.
//!
//! The access mode is fixed at open time, mirroring the protocol's
//! capability negotiation; a handle opened for browsing can never issue
//! a destructive read. Browse semantics over the wire: reads are held
//! unacknowledged to advance a server-side cursor, and browse-first (or
//! close) requeues everything so the queue's disposition never changes.

use lapin::options::{
    BasicGetOptions, BasicPublishOptions, BasicRecoverOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel};
use tracing::{debug, info, warn};

use super::session::Session;
use super::types::{GetOutcome, Message, PayloadEncoding};
use crate::error::MqError;

/// Access mode fixed when the queue is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Destructive input: gets remove messages.
    DestructiveInput,
    /// Non-destructive browsing with first/next cursor semantics.
    Browse,
    /// Output: puts only.
    Output,
}

/// Which get primitive to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetMode {
    /// Read and remove the head message.
    DestructiveNext,
    /// Start browsing from the head of the queue.
    BrowseFirst,
    /// Browse the message after the last one browsed.
    BrowseNext,
}

impl GetMode {
    /// The access mode a handle must have been opened with.
    pub fn required_access(self) -> AccessMode {
        match self {
            GetMode::DestructiveNext => AccessMode::DestructiveInput,
            GetMode::BrowseFirst | GetMode::BrowseNext => AccessMode::Browse,
        }
    }

    fn label(self) -> &'static str {
        match self {
            GetMode::DestructiveNext => "destructive get",
            GetMode::BrowseFirst => "browse-first get",
            GetMode::BrowseNext => "browse-next get",
        }
    }
}

/// The seam between the drivers and the wire. The production
/// implementation is [`QueueHandle`]; tests drive the same operations
/// against an in-memory queue.
#[allow(async_fn_in_trait)]
pub trait QueueOps {
    /// Issue one get. `Ok(GetOutcome::Empty)` is the normal end-of-queue
    /// signal; `Err` is a real protocol failure.
    async fn get(&mut self, mode: GetMode) -> Result<GetOutcome, MqError>;

    /// Enqueue one message. Atomic from the caller's view.
    async fn put(&mut self, message: &Message) -> Result<(), MqError>;

    /// Count messages currently on the queue without reading any.
    async fn depth(&mut self) -> Result<u32, MqError>;
}

/// One open queue under a [`Session`]. Holds a cloned channel handle, a
/// non-owning view: closing the handle never tears down the session.
pub struct QueueHandle {
    channel: Channel,
    queue: String,
    access: AccessMode,
    open: bool,
}

impl QueueHandle {
    /// Open `queue` with the given access mode. Existence is verified up
    /// front; a missing queue or refused access fails with
    /// [`MqError::Open`].
    pub async fn open(
        session: &Session,
        queue: &str,
        access: AccessMode,
    ) -> Result<Self, MqError> {
        // Opening a queue is only valid while the session's channel is
        // still up; a channel the broker already closed would fail the
        // declare anyway, but with a less pointed error.
        if !session.is_connected() {
            return Err(MqError::Open {
                queue: queue.to_string(),
                source: lapin::Error::InvalidChannelState(lapin::ChannelState::Closed),
            });
        }

        let channel = session.channel().clone();
        channel
            .queue_declare(
                queue,
                QueueDeclareOptions {
                    passive: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|source| MqError::Open {
                queue: queue.to_string(),
                source,
            })?;

        info!(queue = queue, access = ?access, "queue_opened");

        Ok(QueueHandle {
            channel,
            queue: queue.to_string(),
            access,
            open: true,
        })
    }

    /// Close the handle. Idempotent and best-effort: a browse handle
    /// requeues everything it read, and any failure while doing so is
    /// logged rather than raised.
    pub async fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;

        if self.access == AccessMode::Browse {
            if let Err(e) = self
                .channel
                .basic_recover(BasicRecoverOptions { requeue: true })
                .await
            {
                warn!(queue = %self.queue, error = %e, "queue_close_recover_error");
            }
        }

        info!(queue = %self.queue, "queue_closed");
    }

    fn check_access(&self, op: &'static str, required: AccessMode) -> Result<(), MqError> {
        if self.access == required {
            Ok(())
        } else {
            Err(MqError::AccessMode {
                op,
                access: self.access,
            })
        }
    }
}

impl QueueOps for QueueHandle {
    async fn get(&mut self, mode: GetMode) -> Result<GetOutcome, MqError> {
        self.check_access(mode.label(), mode.required_access())?;

        // Browse-first resets the cursor: whatever was browsed so far goes
        // back to the head before reading again.
        if mode == GetMode::BrowseFirst {
            self.channel
                .basic_recover(BasicRecoverOptions { requeue: true })
                .await
                .map_err(|source| MqError::Queue {
                    op: "browse cursor reset",
                    source: Box::new(source),
                })?;
        }

        let no_ack = mode == GetMode::DestructiveNext;
        let fetched = self
            .channel
            .basic_get(&self.queue, BasicGetOptions { no_ack })
            .await
            .map_err(|source| MqError::Queue {
                op: mode.label(),
                source: Box::new(source),
            })?;

        match fetched {
            Some(got) => {
                let delivery = got.delivery;
                let encoding = PayloadEncoding::from_content_encoding(
                    delivery
                        .properties
                        .content_encoding()
                        .as_ref()
                        .map(|s| s.as_str()),
                );
                let format = delivery
                    .properties
                    .content_type()
                    .as_ref()
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_default();

                debug!(
                    queue = %self.queue,
                    mode = ?mode,
                    bytes = delivery.data.len(),
                    encoding = ?encoding,
                    "message_received"
                );

                Ok(GetOutcome::Delivered(Message {
                    payload: delivery.data,
                    encoding,
                    format,
                }))
            }
            None => {
                debug!(queue = %self.queue, mode = ?mode, "queue_empty");
                Ok(GetOutcome::Empty)
            }
        }
    }

    async fn put(&mut self, message: &Message) -> Result<(), MqError> {
        self.check_access("put", AccessMode::Output)?;

        let mut properties = BasicProperties::default()
            .with_delivery_mode(2) // Persistent
            .with_content_type(message.format.as_str().into());
        if let Some(tag) = message.encoding.content_encoding() {
            properties = properties.with_content_encoding(tag.into());
        }

        self.channel
            .basic_publish(
                "",
                &self.queue,
                BasicPublishOptions::default(),
                &message.payload,
                properties,
            )
            .await
            .map_err(|source| MqError::Queue {
                op: "put",
                source: Box::new(source),
            })?
            .await
            .map_err(|source| MqError::Queue {
                op: "put confirm",
                source: Box::new(source),
            })?;

        debug!(
            queue = %self.queue,
            bytes = message.payload.len(),
            encoding = ?message.encoding,
            "message_put"
        );

        Ok(())
    }

    async fn depth(&mut self) -> Result<u32, MqError> {
        let state = self
            .channel
            .queue_declare(
                &self.queue,
                QueueDeclareOptions {
                    passive: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|source| MqError::Queue {
                op: "depth inquiry",
                source: Box::new(source),
            })?;

        Ok(state.message_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_modes_require_the_matching_access() {
        assert_eq!(
            GetMode::DestructiveNext.required_access(),
            AccessMode::DestructiveInput
        );
        assert_eq!(GetMode::BrowseFirst.required_access(), AccessMode::Browse);
        assert_eq!(GetMode::BrowseNext.required_access(), AccessMode::Browse);
    }
}
