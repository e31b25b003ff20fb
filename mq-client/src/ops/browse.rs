//! Non-destructive browse with first/next cursor semantics.

use tracing::info;

use crate::codec::{self, CodePage};
use crate::error::MqError;
use crate::queue::{GetMode, GetOutcome, QueueOps};
use crate::report;

/// Cursor state for a browse run. The first successful read switches the
/// cursor from browse-first to browse-next; the empty signal is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseCursor {
    NotStarted,
    FirstIssued,
    NextIssued,
    Exhausted,
}

impl BrowseCursor {
    pub fn new() -> Self {
        BrowseCursor::NotStarted
    }

    /// The get mode the next read should use, or `None` once exhausted.
    pub fn next_mode(&self) -> Option<GetMode> {
        match self {
            BrowseCursor::NotStarted => Some(GetMode::BrowseFirst),
            BrowseCursor::FirstIssued | BrowseCursor::NextIssued => Some(GetMode::BrowseNext),
            BrowseCursor::Exhausted => None,
        }
    }

    /// Record a successful read.
    pub fn advance(&mut self) {
        *self = match self {
            BrowseCursor::NotStarted => BrowseCursor::FirstIssued,
            BrowseCursor::FirstIssued | BrowseCursor::NextIssued => BrowseCursor::NextIssued,
            BrowseCursor::Exhausted => BrowseCursor::Exhausted,
        };
    }

    /// Record the empty signal. Terminal.
    pub fn exhaust(&mut self) {
        *self = BrowseCursor::Exhausted;
    }
}

impl Default for BrowseCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a browse run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseReport {
    /// Messages inspected. Never more than the configured maximum.
    pub browsed: u32,
}

/// Browse up to `max_messages` messages without removing any.
///
/// Unlike drain, a decode failure here must not change the message's
/// disposition, so it downgrades to the hex-dump rendering and the walk
/// continues.
pub async fn browse<Q: QueueOps>(
    queue: &mut Q,
    fallback: &'static CodePage,
    max_messages: u32,
) -> Result<BrowseReport, MqError> {
    println!("{}", report::browse_header(max_messages));

    let mut cursor = BrowseCursor::new();
    let mut browsed = 0u32;

    let result = loop {
        if browsed >= max_messages {
            break Ok(());
        }
        let mode = match cursor.next_mode() {
            Some(mode) => mode,
            None => break Ok(()),
        };

        match queue.get(mode).await {
            Ok(GetOutcome::Delivered(message)) => {
                cursor.advance();
                browsed += 1;
                let text = message
                    .to_text(fallback)
                    .unwrap_or_else(|_| codec::hex_dump(&message.payload));
                println!("{}", report::message_line(browsed, &text));
            }
            Ok(GetOutcome::Empty) => {
                cursor.exhaust();
                if browsed == 0 {
                    println!("{}", report::NO_BROWSE_MESSAGES);
                }
                break Ok(());
            }
            Err(err) => break Err(err),
        }
    };

    println!("{}", report::browse_summary(browsed));
    info!(browsed = browsed, "browse_complete");

    result.map(|()| BrowseReport { browsed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CP037, CP500};
    use crate::queue::memory::InMemoryQueue;
    use crate::queue::{Message, PayloadEncoding};

    #[test]
    fn cursor_walks_first_then_next() {
        let mut cursor = BrowseCursor::new();
        assert_eq!(cursor.next_mode(), Some(GetMode::BrowseFirst));

        cursor.advance();
        assert_eq!(cursor, BrowseCursor::FirstIssued);
        assert_eq!(cursor.next_mode(), Some(GetMode::BrowseNext));

        cursor.advance();
        assert_eq!(cursor, BrowseCursor::NextIssued);
        assert_eq!(cursor.next_mode(), Some(GetMode::BrowseNext));

        cursor.exhaust();
        assert_eq!(cursor.next_mode(), None);
    }

    #[tokio::test]
    async fn browse_is_bounded_by_max_and_leaves_the_queue_alone() {
        let mut queue = InMemoryQueue::seeded(&CP500, &["A", "B", "C", "D", "E"]);

        let report = browse(&mut queue, &CP037, 3).await.unwrap();
        assert_eq!(report.browsed, 3);
        assert_eq!(queue.remaining(), 5);
    }

    #[tokio::test]
    async fn browse_stops_early_on_a_short_queue() {
        let mut queue = InMemoryQueue::seeded(&CP500, &["A", "B", "C"]);

        let report = browse(&mut queue, &CP037, 10).await.unwrap();
        assert_eq!(report.browsed, 3);
        assert_eq!(queue.remaining(), 3);
    }

    #[tokio::test]
    async fn browsing_an_empty_queue_reports_zero() {
        let mut queue = InMemoryQueue::new();
        let report = browse(&mut queue, &CP037, 10).await.unwrap();
        assert_eq!(report.browsed, 0);
    }

    #[tokio::test]
    async fn undecodable_payloads_are_counted_not_fatal() {
        let mut queue = InMemoryQueue::new();
        queue.push_raw(Message {
            payload: vec![0x00, 0xFF, 0x00],
            encoding: PayloadEncoding::Ebcdic500,
            format: String::new(),
        });
        queue.push_raw(Message::outbound("READABLE", &CP500).unwrap());

        let report = browse(&mut queue, &CP037, 10).await.unwrap();
        assert_eq!(report.browsed, 2);
        assert_eq!(queue.remaining(), 2);
    }

    #[tokio::test]
    async fn protocol_errors_propagate() {
        let mut queue = InMemoryQueue::seeded(&CP500, &["A"]);
        queue.fail_next("browse-first get");

        let err = browse(&mut queue, &CP037, 10).await.unwrap_err();
        assert!(matches!(err, MqError::Queue { .. }));
    }
}
