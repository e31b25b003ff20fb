//! Operation drivers and their runners.
//!
//! The drivers (`drain`, `browse`, `depth`, `produce`) hold the loop
//! logic and are generic over [`QueueOps`] so they can be tested against
//! an in-memory queue. The `run_*` functions wrap each driver in the
//! shared session scaffolding: connect, open, drive, then unconditional
//! cleanup with handle close before session disconnect, on every exit
//! path. The scaffold itself is generic over the cleanup seams, so the
//! ordering is pinned by tests too. Cleanup failures are logged inside
//! close/disconnect and never replace the driver's error.

pub mod browse;
pub mod depth;
pub mod drain;
pub mod produce;

use std::future::Future;

use tokio::signal;
use tracing::info;

pub use browse::{browse, BrowseCursor, BrowseReport};
pub use depth::{depth, DepthReport};
pub use drain::{drain, DrainReport};
pub use produce::{produce, PayloadSpec, ProduceReport, SAMPLE_TEXT};

use crate::config::ConnectionConfig;
use crate::error::MqError;
use crate::queue::{AccessMode, QueueHandle, QueueOps, Session};

/// Drain the configured queue destructively until empty (or Ctrl+C).
pub async fn run_drain(config: &ConnectionConfig) -> Result<DrainReport, MqError> {
    let (session, handle) = open_queue(config, AccessMode::DestructiveInput).await?;
    let fallback = config.fallback_codepage;
    drive_and_cleanup(session, handle, |mut handle| async move {
        let result = drain(&mut handle, fallback, shutdown_signal()).await;
        (handle, result)
    })
    .await
}

/// Browse up to `max_messages` from the configured queue.
pub async fn run_browse(
    config: &ConnectionConfig,
    max_messages: u32,
) -> Result<BrowseReport, MqError> {
    let (session, handle) = open_queue(config, AccessMode::Browse).await?;
    let fallback = config.fallback_codepage;
    drive_and_cleanup(session, handle, |mut handle| async move {
        let result = browse(&mut handle, fallback, max_messages).await;
        (handle, result)
    })
    .await
}

/// Inquire and print the configured queue's current depth.
pub async fn run_depth(config: &ConnectionConfig) -> Result<DepthReport, MqError> {
    let (session, handle) = open_queue(config, AccessMode::Browse).await?;
    drive_and_cleanup(session, handle, |mut handle| async move {
        let result = depth(&mut handle, &config.qmgr_name, &config.queue_name).await;
        (handle, result)
    })
    .await
}

/// Put `count` messages onto the configured queue.
pub async fn run_produce(
    config: &ConnectionConfig,
    count: u32,
    payload: &PayloadSpec,
) -> Result<ProduceReport, MqError> {
    let (session, handle) = open_queue(config, AccessMode::Output).await?;
    let codepage = config.put_codepage;
    drive_and_cleanup(session, handle, |mut handle| async move {
        let result = produce(&mut handle, codepage, count, payload).await;
        (handle, result)
    })
    .await
}

/// Connect and open in order; if the open fails, the session is torn
/// down before the error is returned (the connect-failure path has
/// nothing to clean up).
async fn open_queue(
    config: &ConnectionConfig,
    access: AccessMode,
) -> Result<(Session, QueueHandle), MqError> {
    let session = Session::connect(config).await?;
    match QueueHandle::open(&session, &config.queue_name, access).await {
        Ok(handle) => Ok((session, handle)),
        Err(err) => {
            session.disconnect().await;
            Err(err)
        }
    }
}

/// Cleanup side of the scaffold: close the handle it was lent.
#[allow(async_fn_in_trait)]
trait HandleCleanup {
    async fn close(&mut self);
}

/// Cleanup side of the scaffold: tear the session down.
#[allow(async_fn_in_trait)]
trait SessionCleanup {
    async fn disconnect(self);
}

impl HandleCleanup for QueueHandle {
    async fn close(&mut self) {
        QueueHandle::close(self).await;
    }
}

impl SessionCleanup for Session {
    async fn disconnect(self) {
        Session::disconnect(self).await;
    }
}

/// Run `drive` with the open handle, then close the handle and
/// disconnect the session, in that order, whether the driver succeeded
/// or not. The handle travels through the closure by value so the
/// scaffold gets it back for cleanup.
async fn drive_and_cleanup<S, Q, T, F, Fut>(
    session: S,
    handle: Q,
    drive: F,
) -> Result<T, MqError>
where
    S: SessionCleanup,
    Q: HandleCleanup,
    F: FnOnce(Q) -> Fut,
    Fut: Future<Output = (Q, Result<T, MqError>)>,
{
    let (mut handle, result) = drive(handle).await;
    handle.close().await;
    session.disconnect().await;
    result
}

/// Resolves on SIGINT, or SIGTERM where available.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
