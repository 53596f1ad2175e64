//! Services built on top of the station.
//!
//! All transports share a single [`AccessoryStation`](crate::station::AccessoryStation)
//! through `SharedStation<T, S>` wrapped in `Arc`:
//!
//! ```ignore
//! use std::sync::Arc;
//! use trainz_accessories::services::SharedStation;
//!
//! let shared = Arc::new(SharedStation::new(station));
//!
//! // Console and network sessions hold clones of the same Arc
//! let console = Arc::clone(&shared);
//! ```

pub mod shared;

pub use shared::*;
