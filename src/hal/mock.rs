//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for the collaborator traits so the
//! accessory logic can be exercised on a desktop.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockSignal`] | [`TrackSignal`] | Records packets, optional capacity limit |
//! | [`MockStore`] | [`ConfigStore`] | In-memory documents, injectable failures |
//! | [`MockDisplay`] | [`StatusDisplay`] | Records replaced lines |
//!
//! `Vec<String>` implements [`ResponseSink`](crate::traits::ResponseSink)
//! directly and serves as the mock transport.
//!
//! # Example
//!
//! ```rust
//! use trainz_accessories::commands::AccessoryCommand;
//! use trainz_accessories::hal::MockSignal;
//!
//! let mut signal = MockSignal::new();
//! AccessoryCommand::send(&mut signal, 1, 0, true);
//!
//! assert_eq!(signal.packets.len(), 1);
//! assert_eq!(signal.packets[0].bytes, vec![0x81, 0xF9]);
//! ```
//!
//! [`TrackSignal`]: crate::traits::TrackSignal
//! [`ConfigStore`]: crate::traits::ConfigStore
//! [`StatusDisplay`]: crate::traits::StatusDisplay

use std::collections::HashMap;

use crate::error::{SignalError, StoreError, StoreResult};
use crate::traits::{ConfigStore, StatusDisplay, TrackSignal};

// ============================================================================
// Track Signal Mock
// ============================================================================

/// A packet captured by [`MockSignal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPacket {
    /// Packet payload.
    pub bytes: Vec<u8>,
    /// Requested repeat count.
    pub repeats: u8,
}

/// Mock track signal.
///
/// Records every accepted packet. With a capacity set, packets beyond it
/// are rejected with [`SignalError::QueueFull`] and counted in `rejected`.
///
/// # Example
///
/// ```rust
/// use trainz_accessories::hal::MockSignal;
/// use trainz_accessories::traits::TrackSignal;
///
/// let mut signal = MockSignal::new().with_capacity(1);
/// assert!(signal.load_packet(&[0x80, 0xF8], 1).is_ok());
/// assert!(signal.load_packet(&[0x80, 0xF9], 1).is_err());
/// assert_eq!(signal.rejected, 1);
/// ```
#[derive(Debug, Default)]
pub struct MockSignal {
    /// Accepted packets in submission order.
    pub packets: Vec<SentPacket>,
    /// Number of packets rejected because the mock was full.
    pub rejected: usize,
    capacity: Option<usize>,
}

impl MockSignal {
    /// Creates a mock with unlimited capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how many packets are accepted.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Payloads of all accepted packets.
    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.packets.iter().map(|p| p.bytes.clone()).collect()
    }
}

impl TrackSignal for MockSignal {
    type Error = SignalError;

    fn load_packet(&mut self, packet: &[u8], repeats: u8) -> Result<(), SignalError> {
        if let Some(capacity) = self.capacity {
            if self.packets.len() >= capacity {
                self.rejected += 1;
                return Err(SignalError::QueueFull { capacity });
            }
        }
        self.packets.push(SentPacket {
            bytes: packet.to_vec(),
            repeats,
        });
        Ok(())
    }
}

// ============================================================================
// Store Mock
// ============================================================================

/// In-memory document store.
///
/// # Example
///
/// ```rust
/// use trainz_accessories::hal::MockStore;
/// use trainz_accessories::traits::ConfigStore;
///
/// let mut store = MockStore::new().failing();
/// assert!(store.store("turnouts.json", "{}").is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct MockStore {
    /// Stored documents by key.
    pub documents: HashMap<String, String>,
    /// Number of successful writes.
    pub writes: usize,
    fail_writes: bool,
    fail_reads: bool,
}

impl MockStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail with [`StoreError::Unavailable`].
    pub fn failing(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Make every read fail with [`StoreError::Unavailable`].
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Stored document for `key`, if any.
    pub fn document(&self, key: &str) -> Option<&str> {
        self.documents.get(key).map(String::as_str)
    }
}

impl ConfigStore for MockStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads {
            return Err(StoreError::Unavailable {
                key: key.to_string(),
            });
        }
        Ok(self.documents.get(key).cloned())
    }

    fn store(&mut self, key: &str, contents: &str) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::Unavailable {
                key: key.to_string(),
            });
        }
        self.documents.insert(key.to_string(), contents.to_string());
        self.writes += 1;
        Ok(())
    }
}

// ============================================================================
// Display Mock
// ============================================================================

/// Mock status display that records replaced lines.
#[derive(Debug, Default)]
pub struct MockDisplay {
    /// `(line, text)` pairs in call order.
    pub lines: Vec<(u8, String)>,
}

impl MockDisplay {
    /// Creates an empty display.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusDisplay for MockDisplay {
    type Error = ();

    fn replace_line(&mut self, line: u8, text: &str) -> Result<(), ()> {
        self.lines.push((line, text.to_string()));
        Ok(())
    }
}
