//! Depth inquiry: count messages without reading any.

use tracing::info;

use crate::error::MqError;
use crate::queue::QueueOps;
use crate::report;

/// Outcome of a depth inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthReport {
    /// Messages currently on the queue.
    pub depth: u32,
}

/// Single non-destructive inquiry. No looping, no reads. Prints its own
/// summary line, like every other driver.
pub async fn depth<Q: QueueOps>(
    queue: &mut Q,
    qmgr_name: &str,
    queue_name: &str,
) -> Result<DepthReport, MqError> {
    let depth = queue.depth().await?;
    println!("{}", report::depth_summary(qmgr_name, queue_name, depth));
    info!(depth = depth, "depth_inquired");
    Ok(DepthReport { depth })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CP500;
    use crate::queue::memory::InMemoryQueue;

    #[tokio::test]
    async fn depth_is_read_only_and_repeatable() {
        let mut queue = InMemoryQueue::seeded(&CP500, &["A", "B", "C"]);

        for _ in 0..5 {
            let report = depth(&mut queue, "QM01", "DEV.QUEUE.1").await.unwrap();
            assert_eq!(report.depth, 3);
        }
        assert_eq!(queue.remaining(), 3);
    }

    #[tokio::test]
    async fn empty_queue_has_zero_depth() {
        let mut queue = InMemoryQueue::new();
        let report = depth(&mut queue, "QM01", "DEV.QUEUE.1").await.unwrap();
        assert_eq!(report.depth, 0);
    }

    #[tokio::test]
    async fn protocol_errors_propagate() {
        let mut queue = InMemoryQueue::new();
        queue.fail_next("depth inquiry");
        assert!(depth(&mut queue, "QM01", "DEV.QUEUE.1").await.is_err());
    }
}
