//! Destructive drain: read-and-remove every message until the queue is
//! empty, printing each one and a final count.

use std::future::{poll_fn, Future};
use std::pin::Pin;
use std::task::Poll;

use tracing::info;

use crate::codec::CodePage;
use crate::error::MqError;
use crate::queue::{GetMode, GetOutcome, QueueOps};
use crate::report;

/// Outcome of a drain run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// Messages consumed before the queue emptied (or the run stopped).
    pub consumed: u32,
    /// Whether the run was stopped by the shutdown signal.
    pub interrupted: bool,
}

/// Drain the queue. Terminates on the empty signal, on a protocol or
/// decode error, or when `shutdown` resolves; the summary line is
/// printed on every one of those paths, with whatever partial count was
/// reached.
///
/// Decode failures are fatal here: a drain has already removed the
/// message, so silently mangling it would lose data.
///
/// The shutdown signal is sampled between gets, never raced against one.
/// A destructive get removes the message the moment it goes to the wire,
/// so an in-flight get always runs to completion and gets printed and
/// counted before the loop stops.
pub async fn drain<Q: QueueOps>(
    queue: &mut Q,
    fallback: &'static CodePage,
    shutdown: impl Future<Output = ()>,
) -> Result<DrainReport, MqError> {
    println!("{}", report::drain_header());

    tokio::pin!(shutdown);

    let mut consumed = 0u32;
    let mut interrupted = false;

    let result = loop {
        if signalled(shutdown.as_mut()).await {
            info!(consumed = consumed, "drain_interrupted");
            interrupted = true;
            break Ok(());
        }

        match queue.get(GetMode::DestructiveNext).await {
            Ok(GetOutcome::Delivered(message)) => {
                let text = match message.to_text(fallback) {
                    Ok(text) => text,
                    Err(err) => break Err(MqError::from(err)),
                };
                consumed += 1;
                println!("{}", report::message_line(consumed, &text));
            }
            Ok(GetOutcome::Empty) => break Ok(()),
            Err(err) => break Err(err),
        }
    };

    println!("{}", report::drain_summary(consumed));
    info!(consumed = consumed, interrupted = interrupted, "drain_complete");

    result.map(|()| DrainReport {
        consumed,
        interrupted,
    })
}

/// One nonblocking poll of the shutdown future.
async fn signalled<F: Future<Output = ()>>(mut shutdown: Pin<&mut F>) -> bool {
    poll_fn(|cx| Poll::Ready(shutdown.as_mut().poll(cx).is_ready())).await
}
