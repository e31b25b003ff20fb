//! Error taxonomy for the client.
//!
//! The split that matters operationally: an empty queue is *not* an error
//! (see [`crate::queue::GetOutcome::Empty`]); everything here is a real
//! failure. Cleanup failures are never surfaced through this type — they
//! are logged and swallowed so the primary error stays visible.

use thiserror::Error;

use crate::codec::{DecodeError, EncodeError};
use crate::queue::AccessMode;

/// All failures the library surfaces to callers.
#[derive(Debug, Error)]
pub enum MqError {
    /// A mandatory configuration key is missing or empty. Raised before
    /// any connection attempt.
    #[error("missing required configuration value {0}")]
    Config(&'static str),

    /// A configuration key is present but unusable.
    #[error("invalid configuration value {name}: {reason}")]
    ConfigInvalid { name: &'static str, reason: String },

    /// Channel negotiation, authentication or network failure while
    /// connecting. No queue-level cleanup applies; nothing was opened.
    #[error("failed to connect to queue manager {qmgr} at {host_port}")]
    Connect {
        qmgr: String,
        host_port: String,
        #[source]
        source: lapin::Error,
    },

    /// The queue does not exist or could not be opened.
    #[error("failed to open queue {queue}")]
    Open {
        queue: String,
        #[source]
        source: lapin::Error,
    },

    /// A get/put incompatible with the handle's access mode. The mode is
    /// fixed at open time; destructive and browse reads never mix on one
    /// handle.
    #[error("{op} is not permitted on a handle opened for {access:?}")]
    AccessMode { op: &'static str, access: AccessMode },

    /// Any other protocol failure during get/put/inquire. Fatal for the
    /// current driver; cleanup still runs before this propagates.
    #[error("queue operation failed during {op}")]
    Queue {
        op: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Payload could not be interpreted as text. Browse downgrades this
    /// to a hex dump; drain treats it as fatal.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Outbound text could not be represented in the target code page.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
