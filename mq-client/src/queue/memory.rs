//! In-memory queue used to exercise the drivers without a broker.

use std::collections::VecDeque;
use std::io;

use super::handle::{GetMode, QueueOps};
use super::types::{GetOutcome, Message};
use crate::codec::CodePage;
use crate::error::MqError;

/// A queue backed by a `VecDeque`, with the same get semantics the wire
/// handle provides: destructive gets pop, browse gets walk a cursor and
/// leave messages in place.
pub struct InMemoryQueue {
    messages: VecDeque<Message>,
    cursor: usize,
    fail_next: Option<&'static str>,
    close_calls: u32,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        InMemoryQueue {
            messages: VecDeque::new(),
            cursor: 0,
            fail_next: None,
            close_calls: 0,
        }
    }

    /// A queue preloaded with texts encoded in `codepage`.
    pub fn seeded(codepage: &'static CodePage, texts: &[&str]) -> Self {
        let mut queue = Self::new();
        for text in texts {
            let message = Message::outbound(text, codepage).expect("seed text must encode");
            queue.messages.push_back(message);
        }
        queue
    }

    /// Push a raw message, bypassing encoding.
    pub fn push_raw(&mut self, message: Message) {
        self.messages.push_back(message);
    }

    /// Make the next get/put/depth call fail with a protocol error.
    pub fn fail_next(&mut self, op: &'static str) {
        self.fail_next = Some(op);
    }

    pub fn remaining(&self) -> usize {
        self.messages.len()
    }

    pub fn close(&mut self) {
        self.cursor = 0;
        self.close_calls += 1;
    }

    pub fn close_calls(&self) -> u32 {
        self.close_calls
    }

    fn injected_failure(&mut self) -> Option<MqError> {
        self.fail_next.take().map(|op| MqError::Queue {
            op,
            source: Box::new(io::Error::new(io::ErrorKind::Other, "injected failure")),
        })
    }

    fn browse_at_cursor(&mut self) -> GetOutcome {
        match self.messages.get(self.cursor) {
            Some(message) => {
                self.cursor += 1;
                GetOutcome::Delivered(message.clone())
            }
            None => GetOutcome::Empty,
        }
    }
}

impl QueueOps for InMemoryQueue {
    async fn get(&mut self, mode: GetMode) -> Result<GetOutcome, MqError> {
        if let Some(err) = self.injected_failure() {
            return Err(err);
        }
        Ok(match mode {
            GetMode::DestructiveNext => match self.messages.pop_front() {
                Some(message) => GetOutcome::Delivered(message),
                None => GetOutcome::Empty,
            },
            GetMode::BrowseFirst => {
                self.cursor = 0;
                self.browse_at_cursor()
            }
            GetMode::BrowseNext => self.browse_at_cursor(),
        })
    }

    async fn put(&mut self, message: &Message) -> Result<(), MqError> {
        if let Some(err) = self.injected_failure() {
            return Err(err);
        }
        self.messages.push_back(message.clone());
        Ok(())
    }

    async fn depth(&mut self) -> Result<u32, MqError> {
        if let Some(err) = self.injected_failure() {
            return Err(err);
        }
        Ok(self.messages.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CP037;

    #[tokio::test]
    async fn destructive_gets_pop_browse_gets_do_not() {
        let mut queue = InMemoryQueue::seeded(&CP037, &["A", "B"]);

        let browsed = queue.get(GetMode::BrowseFirst).await.unwrap();
        assert!(matches!(browsed, GetOutcome::Delivered(_)));
        assert_eq!(queue.remaining(), 2);

        let taken = queue.get(GetMode::DestructiveNext).await.unwrap();
        assert!(matches!(taken, GetOutcome::Delivered(_)));
        assert_eq!(queue.remaining(), 1);
    }

    #[tokio::test]
    async fn browse_first_resets_the_cursor() {
        let mut queue = InMemoryQueue::seeded(&CP037, &["A", "B"]);

        queue.get(GetMode::BrowseFirst).await.unwrap();
        queue.get(GetMode::BrowseNext).await.unwrap();
        assert_eq!(queue.get(GetMode::BrowseNext).await.unwrap(), GetOutcome::Empty);

        let again = queue.get(GetMode::BrowseFirst).await.unwrap();
        match again {
            GetOutcome::Delivered(message) => {
                assert_eq!(message.to_text(&CP037).unwrap(), "A");
            }
            GetOutcome::Empty => panic!("expected the first message again"),
        }
    }

    #[test]
    fn close_is_idempotent_and_counted() {
        let mut queue = InMemoryQueue::new();
        queue.close();
        queue.close();
        assert_eq!(queue.close_calls(), 2);
    }
}
