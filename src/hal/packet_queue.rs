//! Bounded packet queue between the command path and the waveform generator.
//!
//! [`PacketQueue`] is a fixed-capacity FIFO implementing [`TrackSignal`].
//! The command path pushes; the signal generator pops. Pushing into a full
//! queue fails immediately with [`SignalError::QueueFull`], so command
//! processing never waits on the generator.
//!
//! [`SharedPacketQueue`] wraps a queue in `Arc<Mutex<_>>` for a generator
//! running on another thread. The lock is held only for one push or pop.
//!
//! # Example
//!
//! ```rust
//! use trainz_accessories::hal::PacketQueue;
//! use trainz_accessories::traits::TrackSignal;
//!
//! let mut queue: PacketQueue<2> = PacketQueue::new();
//! queue.load_packet(&[0x81, 0xF9], 1).unwrap();
//! queue.load_packet(&[0x82, 0xF9], 1).unwrap();
//! assert!(queue.load_packet(&[0x83, 0xF9], 1).is_err());
//!
//! let next = queue.pop().unwrap();
//! assert_eq!(next.bytes.as_slice(), &[0x81, 0xF9]);
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use heapless::Deque;

use crate::error::SignalError;
use crate::traits::TrackSignal;

/// Longest packet payload the queue stores (checksum excluded).
pub const MAX_PACKET_LEN: usize = 5;

/// Default queue depth for stations.
pub const DEFAULT_QUEUE_DEPTH: usize = 16;

/// A packet waiting for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedPacket {
    /// Packet payload.
    pub bytes: heapless::Vec<u8, MAX_PACKET_LEN>,
    /// Number of times to transmit.
    pub repeats: u8,
}

/// Fixed-capacity FIFO of packets.
///
/// # Capacity
///
/// The queue holds at most `N` packets. When full, new packets are refused
/// rather than displacing queued ones, so packets go out in submission order.
#[derive(Debug)]
pub struct PacketQueue<const N: usize> {
    packets: Deque<QueuedPacket, N>,
}

impl<const N: usize> Default for PacketQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PacketQueue<N> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            packets: Deque::new(),
        }
    }

    /// Take the oldest packet.
    pub fn pop(&mut self) -> Option<QueuedPacket> {
        self.packets.pop_front()
    }

    /// Number of queued packets.
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    /// `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    /// `true` if no packet can be added.
    pub fn is_full(&self) -> bool {
        self.packets.is_full()
    }

    /// Maximum number of queued packets.
    pub fn capacity(&self) -> usize {
        N
    }

    /// Drop every queued packet.
    pub fn clear(&mut self) {
        self.packets.clear();
    }
}

impl<const N: usize> TrackSignal for PacketQueue<N> {
    type Error = SignalError;

    fn load_packet(&mut self, packet: &[u8], repeats: u8) -> Result<(), SignalError> {
        let bytes = heapless::Vec::from_slice(packet).map_err(|_| SignalError::PacketTooLong {
            len: packet.len(),
            max: MAX_PACKET_LEN,
        })?;
        self.packets
            .push_back(QueuedPacket { bytes, repeats })
            .map_err(|_| SignalError::QueueFull { capacity: N })
    }
}

/// Packet queue shared between the command path and a generator thread.
#[derive(Debug)]
pub struct SharedPacketQueue<const N: usize> {
    inner: Arc<Mutex<PacketQueue<N>>>,
}

impl<const N: usize> Clone for SharedPacketQueue<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<const N: usize> Default for SharedPacketQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SharedPacketQueue<N> {
    /// Creates an empty shared queue.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(PacketQueue::new())),
        }
    }

    /// Take the oldest packet.
    pub fn pop(&self) -> Option<QueuedPacket> {
        self.lock().pop()
    }

    /// Number of queued packets.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PacketQueue<N>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<const N: usize> TrackSignal for SharedPacketQueue<N> {
    type Error = SignalError;

    fn load_packet(&mut self, packet: &[u8], repeats: u8) -> Result<(), SignalError> {
        self.lock().load_packet(packet, repeats)
    }
}
