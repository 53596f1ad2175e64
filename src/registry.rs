//! Collection of turnouts with persistence and bulk reporting.
//!
//! [`TurnoutRegistry`] exclusively owns every [`Turnout`]. It is an explicit
//! value rather than process-wide state, so each station (and each test)
//! holds its own.
//!
//! # Persistence
//!
//! The registry round-trips through a [`ConfigStore`] as one JSON document
//! (see [`crate::messages`]). Persisting happens only on request
//! ([`store`](TurnoutRegistry::store), [`clear`](TurnoutRegistry::clear)),
//! never on every state change.
//!
//! # Example
//!
//! ```rust
//! use trainz_accessories::registry::TurnoutRegistry;
//! use trainz_accessories::turnout::TurnoutOrientation;
//! use trainz_accessories::hal::{MockSignal, MockStore};
//!
//! let mut registry = TurnoutRegistry::new();
//! let mut signal = MockSignal::new();
//! let mut responses: Vec<String> = Vec::new();
//!
//! registry.create_or_update(5, 12, -1, TurnoutOrientation::Left);
//! assert!(registry.set(5, true, &mut signal, &mut responses));
//! assert_eq!(responses, vec!["<H 5 1>".to_string()]);
//! assert_eq!(signal.packets.len(), 1);
//!
//! let mut store = MockStore::new();
//! assert_eq!(registry.store(&mut store).unwrap(), 1);
//! ```

use tracing::{info, warn};

use crate::commands::AccessoryCommand;
use crate::error::StoreResult;
use crate::messages::{TurnoutStatus, TurnoutsDocument};
use crate::traits::{ConfigStore, ResponseSink, StatusDisplay, TrackSignal, ROTATING_STATUS_LINE};
use crate::turnout::{Turnout, TurnoutOrientation};

/// Default store key for the turnout document.
pub const TURNOUTS_KEY: &str = "turnouts.json";

/// Owns all turnouts of a station.
///
/// Iteration order is insertion order within a session. It is not a stable
/// identifier and may differ after a store/load cycle.
#[derive(Debug, Clone)]
pub struct TurnoutRegistry {
    turnouts: Vec<Turnout>,
    key: String,
}

impl Default for TurnoutRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnoutRegistry {
    /// Create an empty registry persisted under [`TURNOUTS_KEY`].
    pub fn new() -> Self {
        Self::with_key(TURNOUTS_KEY)
    }

    /// Create an empty registry persisted under `key`.
    pub fn with_key(key: &str) -> Self {
        Self {
            turnouts: Vec::new(),
            key: key.to_string(),
        }
    }

    /// Store key for this registry's document.
    pub fn key(&self) -> &str {
        &self.key
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Load persisted turnouts, replacing the current contents.
    ///
    /// A missing document yields an empty registry. Restored turnouts keep
    /// their saved position without sending packets. The loaded count is
    /// written to the status display.
    pub fn init<S, D>(&mut self, store: &S, display: &mut D) -> StoreResult<u16>
    where
        S: ConfigStore,
        D: StatusDisplay,
    {
        info!("Initializing turnout list");
        let document = match store.load(&self.key)? {
            Some(contents) => serde_json::from_str::<TurnoutsDocument>(&contents)?,
            None => TurnoutsDocument::default(),
        };

        self.turnouts.clear();
        if document.count > 0 {
            self.turnouts
                .extend(document.turnouts.iter().map(Turnout::from_record));
        }

        let count = self.count();
        info!("Found {} turnouts", count);
        if let Err(e) = display.replace_line(
            ROTATING_STATUS_LINE,
            &format!("Found {:02} Turnouts", count),
        ) {
            warn!("Status display update failed: {:?}", e);
        }
        Ok(count)
    }

    /// Persist every turnout as one document. Returns the number written.
    pub fn store<S: ConfigStore>(&self, store: &mut S) -> StoreResult<u16> {
        let document = TurnoutsDocument {
            count: self.count(),
            turnouts: self.turnouts.iter().map(Turnout::to_record).collect(),
        };
        let contents = serde_json::to_string(&document)?;
        store.store(&self.key, &contents)?;
        info!("Stored {} turnouts", document.count);
        Ok(document.count)
    }

    /// Remove every turnout and persist the empty registry immediately.
    pub fn clear<S: ConfigStore>(&mut self, store: &mut S) -> StoreResult<()> {
        self.turnouts.clear();
        self.store(store)?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    /// Update the turnout with `id`, or add a closed one if none exists.
    pub fn create_or_update(
        &mut self,
        id: u16,
        address: u16,
        index: i8,
        orientation: TurnoutOrientation,
    ) -> &mut Turnout {
        match self.turnouts.iter().position(|t| t.id() == id) {
            Some(pos) => {
                let turnout = &mut self.turnouts[pos];
                turnout.update(address, index, orientation);
                turnout
            }
            None => {
                self.turnouts
                    .push(Turnout::new(id, address, index, false, orientation));
                let last = self.turnouts.len() - 1;
                &mut self.turnouts[last]
            }
        }
    }

    /// Delete the turnout with `id`. Returns `false` if there is none.
    ///
    /// Exactly one entry goes per call; with duplicate ids the last match
    /// is removed.
    pub fn remove(&mut self, id: u16) -> bool {
        match self.turnouts.iter().rposition(|t| t.id() == id) {
            Some(pos) => {
                self.turnouts.remove(pos);
                info!("Removing Turnout({})", id);
                true
            }
            None => false,
        }
    }

    /// Command the turnout with `id` to `thrown`.
    ///
    /// Updates state, sends the accessory packet and reports `<H id thrown>`.
    /// Returns `false` (and sends nothing) if the id is unknown.
    pub fn set<T, R>(&mut self, id: u16, thrown: bool, signal: &mut T, responses: &mut R) -> bool
    where
        T: TrackSignal,
        R: ResponseSink,
    {
        self.apply(id, |_| thrown, signal, responses)
    }

    /// Flip the turnout with `id`. Same contract as [`set`](Self::set).
    pub fn toggle<T, R>(&mut self, id: u16, signal: &mut T, responses: &mut R) -> bool
    where
        T: TrackSignal,
        R: ResponseSink,
    {
        self.apply(id, |t| !t.is_thrown(), signal, responses)
    }

    fn apply<T, R, F>(&mut self, id: u16, next: F, signal: &mut T, responses: &mut R) -> bool
    where
        T: TrackSignal,
        R: ResponseSink,
        F: Fn(&Turnout) -> bool,
    {
        let mut found = false;
        // Every match is updated; ids are unique unless a document was hand-edited.
        for turnout in self.turnouts.iter_mut().filter(|t| t.id() == id) {
            let thrown = next(&*turnout);
            turnout.set(thrown);
            let (address, index) = turnout.decoder_target();
            AccessoryCommand::send(signal, address, index, thrown);
            responses.send(&turnout.state_line());
            info!("Turnout({}) {}", id, crate::messages::state_token(thrown));
            found = true;
        }
        if !found {
            warn!("Unable to locate turnout with ID {}", id);
        }
        found
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    /// Turnout with `id`.
    pub fn by_id(&self, id: u16) -> Option<&Turnout> {
        self.turnouts.iter().find(|t| t.id() == id)
    }

    /// Mutable turnout with `id`.
    pub fn by_id_mut(&mut self, id: u16) -> Option<&mut Turnout> {
        self.turnouts.iter_mut().find(|t| t.id() == id)
    }

    /// First turnout entered with `address`.
    pub fn by_address(&self, address: u16) -> Option<&Turnout> {
        self.turnouts.iter().find(|t| t.address() == address)
    }

    /// Turnout at `position` in iteration order, for enumeration only.
    pub fn by_index(&self, position: u16) -> Option<&Turnout> {
        self.turnouts.get(usize::from(position))
    }

    /// Number of turnouts.
    pub fn count(&self) -> u16 {
        self.turnouts.len() as u16
    }

    /// `true` when no turnouts are defined.
    pub fn is_empty(&self) -> bool {
        self.turnouts.is_empty()
    }

    /// Iterate turnouts in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Turnout> {
        self.turnouts.iter()
    }

    // ------------------------------------------------------------------------
    // Bulk reporting
    // ------------------------------------------------------------------------

    /// Readable records for every turnout.
    pub fn state(&self) -> Vec<TurnoutStatus> {
        self.turnouts.iter().map(Turnout::to_status).collect()
    }

    /// Readable records as a JSON array.
    pub fn state_json(&self) -> serde_json::Result<serde_json::Value> {
        self.turnouts
            .iter()
            .map(|t| t.to_json(true))
            .collect::<serde_json::Result<Vec<_>>>()
            .map(serde_json::Value::Array)
    }

    /// Send one `<H id address subaddress thrown>` line per turnout.
    pub fn show_status<R: ResponseSink>(&self, responses: &mut R) {
        for turnout in &self.turnouts {
            responses.send(&turnout.status_line());
        }
    }
}

impl<'a> IntoIterator for &'a TurnoutRegistry {
    type Item = &'a Turnout;
    type IntoIter = core::slice::Iter<'a, Turnout>;

    fn into_iter(self) -> Self::IntoIter {
        self.turnouts.iter()
    }
}
