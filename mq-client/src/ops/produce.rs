//! Producer: encode text payloads and enqueue them.

use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::info;

use crate::codec::CodePage;
use crate::error::MqError;
use crate::queue::{Message, QueueOps};
use crate::report;

/// Sample fixed-text record sent when no payload is supplied, matching
/// the record layout the producer is normally fed.
pub const SAMPLE_TEXT: &str = r#"[{"ISN_EMPLOYEES":1,"PERSONNEL_ID":"50005800","FIRST_NAME":"SIMONE","NAME":"SMITH","MIDDLE_NAME":"SARAH","MAR_STAT":"M","SEX":"F","BIRTH":"1990-12-04","CITY":"JOIGNY","POST_CODE":"89300","COUNTRY":"F  ","AREA_CODE":"1033","PHONE":"44864858","DEPT":"","JOB_TITLE":"CHEF DE SERVICE","LEAVE_DUE":19,"LEAVE_TAKEN":5,"LEAVE_LEFT":"8fnw9Q==","DEPARTMENT":"    ","DEPT_PERSON":"      SMITH"}]"#;

/// Where each outbound payload's text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSpec {
    /// Caller-supplied text, sent as-is for every message.
    Fixed(String),
    /// The built-in sample record.
    Sample,
    /// Fresh random ASCII text (up to 80 chars) per message.
    Random,
}

impl PayloadSpec {
    fn render(&self) -> String {
        match self {
            PayloadSpec::Fixed(text) => text.clone(),
            PayloadSpec::Sample => SAMPLE_TEXT.to_string(),
            PayloadSpec::Random => {
                let mut rng = rand::thread_rng();
                let len = rng.gen_range(1..=80);
                rng.sample_iter(&Alphanumeric)
                    .take(len)
                    .map(char::from)
                    .collect()
            }
        }
    }
}

/// Outcome of a produce run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProduceReport {
    /// Messages actually enqueued.
    pub sent: u32,
}

/// Put `count` messages, each encoded with `codepage` and tagged with
/// the same code page's CCSID. The first failure aborts the remaining
/// iterations; the summary still reports what made it out.
pub async fn produce<Q: QueueOps>(
    queue: &mut Q,
    codepage: &'static CodePage,
    count: u32,
    payload: &PayloadSpec,
) -> Result<ProduceReport, MqError> {
    println!("{}", report::produce_header(count, codepage));

    let mut sent = 0u32;

    let result = loop {
        if sent >= count {
            break Ok(());
        }
        let text = payload.render();
        let message = match Message::outbound(&text, codepage) {
            Ok(message) => message,
            Err(err) => break Err(MqError::from(err)),
        };
        match queue.put(&message).await {
            Ok(()) => {
                sent += 1;
                println!(
                    "{}",
                    report::sent_line(sent, message.payload.len(), codepage, &text)
                );
            }
            Err(err) => break Err(err),
        }
    };

    println!("{}", report::produce_summary(sent));
    info!(sent = sent, ccsid = codepage.ccsid, "produce_complete");

    result.map(|()| ProduceReport { sent })
}

#[cfg(test)]
mod tests {
    use std::future::pending;

    use super::*;
    use crate::codec::{CP037, CP500};
    use crate::ops::drain::drain;
    use crate::queue::memory::InMemoryQueue;

    #[tokio::test]
    async fn produce_then_drain_round_trips() {
        let mut queue = InMemoryQueue::new();

        let spec = PayloadSpec::Fixed("ORDER 7 CONFIRMED".to_string());
        let produced = produce(&mut queue, &CP500, 4, &spec).await.unwrap();
        assert_eq!(produced.sent, 4);
        assert_eq!(queue.remaining(), 4);

        let drained = drain(&mut queue, &CP037, pending()).await.unwrap();
        assert_eq!(drained.consumed, 4);
        assert_eq!(queue.remaining(), 0);
    }

    #[tokio::test]
    async fn sample_record_encodes_in_both_codepages() {
        for codepage in [&CP037, &CP500] {
            let mut queue = InMemoryQueue::new();
            let report = produce(&mut queue, codepage, 1, &PayloadSpec::Sample)
                .await
                .unwrap();
            assert_eq!(report.sent, 1);
        }
    }

    #[tokio::test]
    async fn unencodable_text_aborts_before_any_put() {
        let mut queue = InMemoryQueue::new();
        let spec = PayloadSpec::Fixed("costs 10€".to_string());

        let err = produce(&mut queue, &CP500, 3, &spec).await.unwrap_err();
        assert!(matches!(err, MqError::Encode(_)));
        assert_eq!(queue.remaining(), 0);
    }

    #[tokio::test]
    async fn put_failure_aborts_remaining_iterations() {
        let mut queue = InMemoryQueue::new();
        queue.fail_next("put");

        let err = produce(&mut queue, &CP500, 3, &PayloadSpec::Sample)
            .await
            .unwrap_err();
        assert!(matches!(err, MqError::Queue { .. }));
        assert_eq!(queue.remaining(), 0);
    }

    #[tokio::test]
    async fn random_payloads_are_always_encodable() {
        let mut queue = InMemoryQueue::new();
        let report = produce(&mut queue, &CP037, 20, &PayloadSpec::Random)
            .await
            .unwrap();
        assert_eq!(report.sent, 20);
    }
}
