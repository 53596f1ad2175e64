//! # trainz-accessories
//!
//! Turnout and accessory decoder control for a DCC command station.
//!
//! ## Features
//!
//! - **Address translation**: Linear accessory addresses to board address and output index
//! - **Packet encoding**: Two-byte basic accessory decoder packets
//! - **Turnout registry**: Named turnouts with persisted state, restored without moving points
//! - **Text protocol**: `<T ...>`, `<a ...>`, `<E>`, `<e>`, `<s>` frames with `<O>`/`<X>`/`<H ...>` replies
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Seams for the track signal, document store, client sink and status display
//! - `dcc` - Address arithmetic and packet bytes
//! - `turnout` - The turnout entity
//! - `registry` - Turnout collection with persistence
//! - `commands` - `T` and `a` command adapters
//! - `station` - Frame dispatch tying everything together
//! - `hal` - Concrete implementations (mocks, packet queue, file store)
//!
//! ## Example
//!
//! ```rust
//! use trainz_accessories::{
//!     AccessoryStation, Config,
//!     hal::{MockSignal, MockStore},
//! };
//!
//! let mut station = AccessoryStation::new(MockSignal::new(), MockStore::new(), &Config::default());
//! let mut responses: Vec<String> = Vec::new();
//!
//! // Define turnout 5 on accessory address 12, then throw it
//! station.process_line("<T 5 12 -1>", &mut responses).unwrap();
//! station.process_line("<T 5 1>", &mut responses).unwrap();
//! station.process_line("<T>", &mut responses).unwrap();
//!
//! assert_eq!(responses, vec!["<O>", "<H 5 1>", "<H 5 12 -1 1>"]);
//! assert_eq!(station.signal().payloads(), vec![vec![0x83, 0xFF]]);
//! ```

#![warn(missing_docs)]

/// Text command adapters and response tokens.
pub mod commands;
/// Accessory address translation and packet encoding.
pub mod dcc;
/// Error types for storage and the track signal.
pub mod error;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Turnout collection with persistence.
pub mod registry;
/// Frame dispatch over a registry, signal and store.
pub mod station;
/// Core traits for the subsystem's collaborators.
pub mod traits;
/// Turnout entity and orientation.
pub mod turnout;

/// Station configuration.
pub mod config;

/// Serialized turnout records.
pub mod messages;

/// Shared station access for multi-threaded hosts.
pub mod services;

// Re-exports for convenience
pub use commands::{
    parse_int, AccessoryCommand, TurnoutCommand, TurnoutOperation, COMMAND_FAILED_RESPONSE,
    COMMAND_SUCCESSFUL_RESPONSE,
};
pub use dcc::{translate_address, AccessoryPacket};
pub use error::{SignalError, StoreError, StoreResult};
pub use registry::TurnoutRegistry;
pub use station::AccessoryStation;
pub use traits::{
    ConfigStore, NoDisplay, ResponseSink, StatusDisplay, TrackSignal, ROTATING_STATUS_LINE,
};
pub use turnout::{Addressing, Turnout, TurnoutOrientation};

// Config re-exports
pub use config::{Config, DeviceConfig, StationConfig, StorageConfig};

// Message re-exports
pub use messages::{TurnoutRecord, TurnoutStatus, TurnoutsDocument};
