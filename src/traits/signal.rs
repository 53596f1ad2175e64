//! Track-signal abstraction.
//!
//! The DCC waveform generator is an external collaborator: it receives
//! finished packet payloads (without preamble or checksum) and owns all
//! bit timing and repeat scheduling. This module only defines the seam.
//!
//! # Example
//!
//! ```rust
//! use trainz_accessories::traits::TrackSignal;
//! use trainz_accessories::hal::MockSignal;
//!
//! let mut signal = MockSignal::new();
//! signal.load_packet(&[0x81, 0xF9], 1).unwrap();
//!
//! assert_eq!(signal.packets.len(), 1);
//! assert_eq!(signal.packets[0].bytes, vec![0x81, 0xF9]);
//! ```

/// Sink for DCC packets bound for the operations track.
///
/// Implementations must not block the command path for longer than a
/// bounded wait. When no slot is free they return an error and the caller
/// drops the packet.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use trainz_accessories::traits::TrackSignal;
///
/// struct RmtSignal { /* RMT channel, ring buffer */ }
///
/// impl TrackSignal for RmtSignal {
///     type Error = ();
///
///     fn load_packet(&mut self, packet: &[u8], repeats: u8) -> Result<(), ()> {
///         // Append checksum, queue for the encoder ISR...
///         Ok(())
///     }
/// }
/// ```
pub trait TrackSignal {
    /// Error type for packet submission.
    type Error: core::fmt::Debug;

    /// Queue `packet` for transmission `repeats` times.
    fn load_packet(&mut self, packet: &[u8], repeats: u8) -> Result<(), Self::Error>;
}

impl<T: TrackSignal + ?Sized> TrackSignal for &mut T {
    type Error = T::Error;

    fn load_packet(&mut self, packet: &[u8], repeats: u8) -> Result<(), Self::Error> {
        (**self).load_packet(packet, repeats)
    }
}
