//! Trait definitions for the accessory subsystem's external collaborators.
//!
//! This module defines the seams that let the turnout logic run against
//! real hardware on a command station or against mocks on a desktop:
//!
//! # Submodules
//!
//! - `signal`: DCC track-signal generator that accepts finished packets
//! - `storage`: Key/document store for persisted turnout state
//! - `transport`: Client connection receiving protocol responses
//! - `display`: Status screen
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`TrackSignal`] | Enqueue accessory packets for the operations track |
//! | [`ConfigStore`] | Load and atomically replace JSON documents |
//! | [`ResponseSink`] | Emit `<O>`, `<X>`, `<H ...>` lines |
//! | [`StatusDisplay`] | Replace a line on the status screen |
//!
//! Mock implementations live in [`crate::hal::mock`].

pub mod display;
pub mod signal;
pub mod storage;
pub mod transport;

pub use display::*;
pub use signal::*;
pub use storage::*;
pub use transport::*;
