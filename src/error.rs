//! Error types for persistence and track-signal delivery.
//!
//! Only resource and I/O failures are errors. A missing turnout or a
//! malformed command is reported through `bool` returns and the `<X>`
//! response token instead.

use thiserror::Error;

/// Failure reading or writing persisted accessory state.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying storage media failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document could not be encoded or decoded.
    #[error("invalid persisted JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The store refused the operation (read-only, unmounted, ...).
    #[error("store unavailable for key '{key}'")]
    Unavailable {
        /// Key that was being read or written.
        key: String,
    },
}

/// Failure handing a packet to the track-signal generator.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalError {
    /// The generator's packet queue has no free slot.
    #[error("packet queue full (capacity {capacity})")]
    QueueFull {
        /// Number of packets the queue holds.
        capacity: usize,
    },

    /// Packet is longer than the generator accepts.
    #[error("packet of {len} bytes exceeds the {max} byte limit")]
    PacketTooLong {
        /// Length of the rejected packet.
        len: usize,
        /// Maximum packet length.
        max: usize,
    },
}

/// Result alias for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;
