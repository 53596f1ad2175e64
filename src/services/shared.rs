//! Shared station access for multi-threaded hosts.
//!
//! `SharedStation` wraps one [`AccessoryStation`] in a `Mutex` so every
//! client connection (console, network session, physical panel) drives the
//! same registry. One frame is processed completely before the next starts.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use trainz_accessories::config::Config;
//! use trainz_accessories::hal::{MockSignal, MockStore};
//! use trainz_accessories::services::{LineHandler, SharedStation};
//! use trainz_accessories::station::AccessoryStation;
//!
//! let station = AccessoryStation::new(MockSignal::new(), MockStore::new(), &Config::default());
//! let shared = Arc::new(SharedStation::new(station));
//!
//! let replies = shared.handle_line("<T 1 40 2>");
//! assert_eq!(replies, vec!["<O>"]);
//! assert_eq!(shared.state()[0].state, "CLOSED");
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::error::StoreResult;
use crate::messages::TurnoutStatus;
use crate::station::AccessoryStation;
use crate::traits::{ConfigStore, ResponseSink, StatusDisplay, TrackSignal};

// ============================================================================
// Line Handler Trait
// ============================================================================

/// Something that answers protocol frames.
///
/// This lets transports hold a trait object instead of naming the signal
/// and store types.
pub trait LineHandler: Send + Sync {
    /// Process one frame and collect the replies.
    fn handle_line(&self, line: &str) -> Vec<String>;

    /// Readable snapshot of every turnout.
    fn state(&self) -> Vec<TurnoutStatus>;
}

// ============================================================================
// Shared Station
// ============================================================================

/// One station shared between services.
///
/// # Thread Safety
///
/// A `Mutex` rather than an `RwLock`: nearly every frame mutates the
/// registry or the signal queue.
#[derive(Debug)]
pub struct SharedStation<T: TrackSignal, S: ConfigStore> {
    station: Mutex<AccessoryStation<T, S>>,
}

impl<T: TrackSignal, S: ConfigStore> SharedStation<T, S> {
    /// Wrap a station.
    pub fn new(station: AccessoryStation<T, S>) -> Self {
        Self {
            station: Mutex::new(station),
        }
    }

    /// Run `f` with exclusive access to the station.
    ///
    /// A panic in an earlier holder does not lock everyone out; the station
    /// is used as that holder left it.
    pub fn with_station<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut AccessoryStation<T, S>) -> R,
    {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    /// Load persisted turnouts.
    pub fn init<D: StatusDisplay>(&self, display: &mut D) -> StoreResult<u16> {
        self.with_station(|station| station.init(display))
    }

    /// Process one frame, sending replies to `responses`.
    pub fn process_line<R: ResponseSink>(&self, line: &str, responses: &mut R) -> StoreResult<()> {
        self.with_station(|station| station.process_line(line, responses))
    }

    /// Readable snapshot of every turnout.
    pub fn state(&self) -> Vec<TurnoutStatus> {
        self.lock().registry().state()
    }

    /// Consume the wrapper and return the station.
    pub fn into_inner(self) -> AccessoryStation<T, S> {
        self.station
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, AccessoryStation<T, S>> {
        self.station.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// LineHandler Implementation for Arc<SharedStation>
// ============================================================================

impl<T, S> LineHandler for Arc<SharedStation<T, S>>
where
    T: TrackSignal + Send + 'static,
    S: ConfigStore + Send + 'static,
{
    fn handle_line(&self, line: &str) -> Vec<String> {
        let mut responses: Vec<String> = Vec::new();
        if let Err(e) = self.process_line(line, &mut responses) {
            // The failure token is already in `responses`.
            warn!("Frame '{}' failed: {}", line.trim(), e);
        }
        responses
    }

    fn state(&self) -> Vec<TurnoutStatus> {
        SharedStation::state(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::hal::{MockDisplay, MockSignal, MockStore, SharedPacketQueue};

    fn shared() -> Arc<SharedStation<MockSignal, MockStore>> {
        let station = AccessoryStation::new(MockSignal::new(), MockStore::new(), &Config::default());
        Arc::new(SharedStation::new(station))
    }

    // ========================================================================
    // SharedStation tests
    // ========================================================================

    #[test]
    fn with_station_access() {
        let shared = shared();
        shared.with_station(|station| {
            assert!(station.registry().is_empty());
        });
    }

    #[test]
    fn init_and_state_snapshot() {
        let mut store = MockStore::new();
        store.documents.insert(
            "turnouts.json".to_string(),
            r#"{"count":1,"turnouts":[{"id":9,"address":12,"subAddress":-1,"state":true}]}"#
                .to_string(),
        );
        let station = AccessoryStation::new(MockSignal::new(), store, &Config::default());
        let shared = SharedStation::new(station);

        assert_eq!(shared.init(&mut MockDisplay::new()).unwrap(), 1);
        let state = shared.state();
        assert_eq!(state[0].id, 9);
        assert_eq!(state[0].state, "THROWN");
        assert!(shared.into_inner().signal().packets.is_empty());
    }

    #[test]
    fn concurrent_clients_share_registry() {
        let shared = shared();
        let handles: Vec<_> = (1..=4u16)
            .map(|id| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || shared.handle_line(&format!("<T {} {} -1>", id, id * 4)))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), vec!["<O>"]);
        }
        assert_eq!(LineHandler::state(&shared).len(), 4);
    }

    #[test]
    fn packet_queue_collaborator() {
        let queue: SharedPacketQueue<4> = SharedPacketQueue::new();
        let station = AccessoryStation::new(queue.clone(), MockStore::new(), &Config::default());
        let shared = Arc::new(SharedStation::new(station));

        assert!(shared.handle_line("<a 1 0 1>").is_empty());
        assert_eq!(queue.pop().unwrap().bytes.as_slice(), &[0x81, 0xF9]);
    }

    // ========================================================================
    // LineHandler trait implementation tests
    // ========================================================================

    #[test]
    fn handle_line_failure_still_replies() {
        let station =
            AccessoryStation::new(MockSignal::new(), MockStore::new().failing(), &Config::default());
        let shared = Arc::new(SharedStation::new(station));
        assert_eq!(shared.handle_line("<E>"), vec!["<X>"]);
    }

    #[test]
    fn handler_as_trait_object() {
        let handler: Box<dyn LineHandler> = Box::new(shared());
        assert_eq!(handler.handle_line("<T>"), vec!["<X>"]);
        assert!(handler.state().is_empty());
    }
}
