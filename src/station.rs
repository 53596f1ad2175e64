//! Text frame dispatch for the accessory subsystem.
//!
//! [`AccessoryStation`] owns a [`TurnoutRegistry`] together with the track
//! signal and document store it talks to, and routes protocol frames:
//!
//! | Frame | Action |
//! |-------|--------|
//! | `<T ...>` | [`TurnoutCommand`] |
//! | `<a ...>` | [`AccessoryCommand`] |
//! | `<E>` | persist turnouts, `<O>` or `<X>` |
//! | `<e>` | delete every turnout and persist, `<O>` or `<X>` |
//! | `<s>` | one status line per turnout |
//!
//! The command letter is the first character of the frame; the remaining
//! text is split on whitespace into arguments. Delimiters are optional.
//!
//! # Example
//!
//! ```rust
//! use trainz_accessories::config::Config;
//! use trainz_accessories::hal::{MockSignal, MockStore};
//! use trainz_accessories::station::AccessoryStation;
//!
//! let mut station = AccessoryStation::new(MockSignal::new(), MockStore::new(), &Config::default());
//! let mut responses: Vec<String> = Vec::new();
//!
//! station.process_line("<T 5 12 -1>", &mut responses).unwrap();
//! station.process_line("<T 5 1>", &mut responses).unwrap();
//! assert_eq!(responses, vec!["<O>", "<H 5 1>"]);
//! ```

use tracing::{debug, error, info, warn};

use crate::commands::{
    AccessoryCommand, TurnoutCommand, TurnoutOperation, COMMAND_FAILED_RESPONSE,
    COMMAND_SUCCESSFUL_RESPONSE,
};
use crate::config::Config;
use crate::error::StoreResult;
use crate::registry::TurnoutRegistry;
use crate::traits::{ConfigStore, ResponseSink, StatusDisplay, TrackSignal};

/// Registry plus the collaborators its commands need.
#[derive(Debug)]
pub struct AccessoryStation<T: TrackSignal, S: ConfigStore> {
    registry: TurnoutRegistry,
    signal: T,
    store: S,
    turnout_command: TurnoutCommand,
    autosave: bool,
}

impl<T: TrackSignal, S: ConfigStore> AccessoryStation<T, S> {
    /// Create a station with an empty registry. Call [`init`](Self::init)
    /// to load persisted turnouts.
    pub fn new(signal: T, store: S, config: &Config) -> Self {
        Self {
            registry: TurnoutRegistry::with_key(config.storage.turnouts_key.as_str()),
            signal,
            store,
            turnout_command: TurnoutCommand::new(config.station.list_empty_fails),
            autosave: config.station.autosave,
        }
    }

    /// Load persisted turnouts and report the count on `display`.
    pub fn init<D: StatusDisplay>(&mut self, display: &mut D) -> StoreResult<u16> {
        self.registry.init(&self.store, display)
    }

    /// Handle one protocol frame.
    ///
    /// Replies go to `responses`. Only a failed `E`/`e` persist returns
    /// `Err`, after `<X>` has already been sent.
    pub fn process_line<R: ResponseSink>(&mut self, line: &str, responses: &mut R) -> StoreResult<()> {
        let frame = strip_delimiters(line);
        let mut chars = frame.chars();
        let letter = match chars.next() {
            Some(c) => c,
            None => return Ok(()),
        };
        let args: Vec<&str> = chars.as_str().split_whitespace().collect();
        debug!("Frame '{}' with {} arguments", letter, args.len());

        match letter {
            'T' => {
                let operation = TurnoutOperation::parse(&args[..]);
                self.turnout_command.process(
                    &args[..],
                    &mut self.registry,
                    &mut self.signal,
                    responses,
                );
                if self.autosave
                    && matches!(
                        operation,
                        TurnoutOperation::Define { .. } | TurnoutOperation::Delete { .. }
                    )
                {
                    if let Err(e) = self.registry.store(&mut self.store) {
                        warn!("Autosave of turnouts failed: {}", e);
                    }
                }
            }
            'a' => {
                AccessoryCommand::process(&args[..], &mut self.signal, responses);
            }
            'E' => return self.persist(responses, false),
            'e' => return self.persist(responses, true),
            's' => self.registry.show_status(responses),
            other => {
                warn!("Unsupported command '{}'", other);
                responses.send(COMMAND_FAILED_RESPONSE);
            }
        }
        Ok(())
    }

    fn persist<R: ResponseSink>(&mut self, responses: &mut R, clear: bool) -> StoreResult<()> {
        let result = if clear {
            info!("Clearing all turnouts");
            self.registry.clear(&mut self.store)
        } else {
            self.registry.store(&mut self.store).map(|_| ())
        };
        match result {
            Ok(()) => {
                responses.send(COMMAND_SUCCESSFUL_RESPONSE);
                Ok(())
            }
            Err(e) => {
                error!("Persisting turnouts failed: {}", e);
                responses.send(COMMAND_FAILED_RESPONSE);
                Err(e)
            }
        }
    }

    /// The turnout registry.
    pub fn registry(&self) -> &TurnoutRegistry {
        &self.registry
    }

    /// Mutable turnout registry.
    pub fn registry_mut(&mut self) -> &mut TurnoutRegistry {
        &mut self.registry
    }

    /// The track signal.
    pub fn signal(&self) -> &T {
        &self.signal
    }

    /// Mutable track signal.
    pub fn signal_mut(&mut self) -> &mut T {
        &mut self.signal
    }

    /// The document store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Take the station apart.
    pub fn into_parts(self) -> (TurnoutRegistry, T, S) {
        (self.registry, self.signal, self.store)
    }
}

fn strip_delimiters(line: &str) -> &str {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('<').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('>').unwrap_or(trimmed);
    trimmed.trim()
}
