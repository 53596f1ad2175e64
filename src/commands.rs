//! Text command adapters for turnouts and raw accessory packets.
//!
//! Each adapter receives the argument tokens of one command (the command
//! letter already stripped), validates the argument count, and either
//! mutates the [`TurnoutRegistry`] or sends a packet directly.
//!
//! # Turnout Command (`T`)
//!
//! | Arguments | Operation | Reply |
//! |-----------|-----------|-------|
//! | none | list | one `<H id address subaddress thrown>` per turnout, `<X>` if none |
//! | `id` | delete | `<O>`, or `<X>` if not found |
//! | `id thrown` | set state | `<H id thrown>`, or `<X>` if not found |
//! | `id address subaddress` | create or update | `<O>` |
//! | anything else | | `<X>` |
//!
//! # Accessory Command (`a`)
//!
//! `a address output activate` sends one basic accessory packet and gives
//! no reply.
//!
//! # Number Parsing
//!
//! Tokens are read with [`parse_int`]: a leading integer is taken and the
//! rest ignored, so a token with no digits reads as `0`. There is no
//! separate parse error.
//!
//! ```rust
//! use trainz_accessories::commands::{TurnoutCommand, COMMAND_SUCCESSFUL_RESPONSE};
//! use trainz_accessories::registry::TurnoutRegistry;
//! use trainz_accessories::hal::MockSignal;
//!
//! let mut registry = TurnoutRegistry::new();
//! let mut signal = MockSignal::new();
//! let mut responses: Vec<String> = Vec::new();
//!
//! TurnoutCommand::new(true).process(&["5", "12", "-1"], &mut registry, &mut signal, &mut responses);
//! assert_eq!(responses, vec![COMMAND_SUCCESSFUL_RESPONSE.to_string()]);
//! ```

use tracing::{debug, warn};

use crate::dcc::{AccessoryPacket, ACCESSORY_PACKET_REPEATS};
use crate::registry::TurnoutRegistry;
use crate::traits::{ResponseSink, TrackSignal};
use crate::turnout::TurnoutOrientation;

/// Reply for a command that succeeded.
pub const COMMAND_SUCCESSFUL_RESPONSE: &str = "<O>";

/// Reply for a command that failed or was malformed.
pub const COMMAND_FAILED_RESPONSE: &str = "<X>";

/// Read the leading integer of a token.
///
/// Leading whitespace and one sign are accepted; parsing stops at the first
/// non-digit. Values wrap on overflow.
///
/// # Examples
///
/// ```
/// use trainz_accessories::commands::parse_int;
///
/// assert_eq!(parse_int("42"), 42);
/// assert_eq!(parse_int("-1"), -1);
/// assert_eq!(parse_int("12abc"), 12);
/// assert_eq!(parse_int("abc"), 0);
/// assert_eq!(parse_int(""), 0);
/// ```
pub fn parse_int(token: &str) -> i32 {
    let s = token.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i32, |acc, b| {
            acc.wrapping_mul(10).wrapping_add(i32::from(b - b'0'))
        });
    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

// ============================================================================
// Turnout Command
// ============================================================================

/// Operation selected by a `T` command's argument count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnoutOperation {
    /// List every turnout.
    List,
    /// Delete a turnout.
    Delete {
        /// Turnout to delete.
        id: u16,
    },
    /// Set thrown state.
    Set {
        /// Turnout to command.
        id: u16,
        /// `true` to throw.
        thrown: bool,
    },
    /// Create or update a turnout definition.
    Define {
        /// Turnout identifier.
        id: u16,
        /// Accessory or board address.
        address: u16,
        /// Output index, -1 to derive.
        index: i8,
    },
    /// Unsupported argument count.
    Invalid,
}

impl TurnoutOperation {
    /// Select the operation for `args`.
    ///
    /// Numbers are truncated to the field widths (`id`/`address` 16 bit,
    /// `index` 8 bit signed). A thrown flag other than `1` means closed.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Self {
        let int = |i: usize| parse_int(args[i].as_ref());
        match args.len() {
            0 => TurnoutOperation::List,
            1 => TurnoutOperation::Delete { id: int(0) as u16 },
            2 => TurnoutOperation::Set {
                id: int(0) as u16,
                thrown: int(1) == 1,
            },
            3 => TurnoutOperation::Define {
                id: int(0) as u16,
                address: int(1) as u16,
                index: int(2) as i8,
            },
            _ => TurnoutOperation::Invalid,
        }
    }
}

/// Adapter for the `T` command.
#[derive(Clone, Copy, Debug)]
pub struct TurnoutCommand {
    list_empty_fails: bool,
}

impl Default for TurnoutCommand {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TurnoutCommand {
    /// Create the adapter. With `list_empty_fails`, listing an empty
    /// registry replies `<X>`.
    pub fn new(list_empty_fails: bool) -> Self {
        Self { list_empty_fails }
    }

    /// Run one `T` command.
    pub fn process<S, T, R>(
        &self,
        args: &[S],
        registry: &mut TurnoutRegistry,
        signal: &mut T,
        responses: &mut R,
    ) where
        S: AsRef<str>,
        T: TrackSignal,
        R: ResponseSink,
    {
        match TurnoutOperation::parse(args) {
            TurnoutOperation::List => {
                if registry.is_empty() && self.list_empty_fails {
                    responses.send(COMMAND_FAILED_RESPONSE);
                } else {
                    registry.show_status(responses);
                }
            }
            TurnoutOperation::Delete { id } => {
                if registry.remove(id) {
                    responses.send(COMMAND_SUCCESSFUL_RESPONSE);
                } else {
                    warn!("Unable to delete turnout with ID {}", id);
                    responses.send(COMMAND_FAILED_RESPONSE);
                }
            }
            TurnoutOperation::Set { id, thrown } => {
                // Success is reported by the registry's `<H id thrown>` line.
                if !registry.set(id, thrown, signal, responses) {
                    responses.send(COMMAND_FAILED_RESPONSE);
                }
            }
            TurnoutOperation::Define { id, address, index } => {
                registry.create_or_update(id, address, index, TurnoutOrientation::Left);
                responses.send(COMMAND_SUCCESSFUL_RESPONSE);
            }
            TurnoutOperation::Invalid => {
                warn!("Turnout command with {} arguments rejected", args.len());
                responses.send(COMMAND_FAILED_RESPONSE);
            }
        }
    }
}

// ============================================================================
// Accessory Command
// ============================================================================

/// Adapter for the `a` command.
///
/// This is also the path [`TurnoutRegistry::set`] uses to move a turnout.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccessoryCommand;

impl AccessoryCommand {
    /// Run one `a address output activate` command.
    ///
    /// Returns the packet that was built, or `None` (after replying `<X>`)
    /// when the argument count is wrong. A nonzero activate token is true.
    pub fn process<S, T, R>(
        args: &[S],
        signal: &mut T,
        responses: &mut R,
    ) -> Option<AccessoryPacket>
    where
        S: AsRef<str>,
        T: TrackSignal,
        R: ResponseSink,
    {
        if args.len() != 3 {
            warn!("Accessory command with {} arguments rejected", args.len());
            responses.send(COMMAND_FAILED_RESPONSE);
            return None;
        }
        let address = parse_int(args[0].as_ref()) as u16;
        let output = parse_int(args[1].as_ref()) as u8;
        let activate = parse_int(args[2].as_ref()) != 0;
        Some(Self::send(signal, address, output, activate))
    }

    /// Build the packet and hand it to the track signal once.
    ///
    /// A full signal queue drops the packet with a warning; the command
    /// path never waits for space.
    pub fn send<T: TrackSignal>(
        signal: &mut T,
        address: u16,
        output: u8,
        activate: bool,
    ) -> AccessoryPacket {
        let packet = AccessoryPacket::new(address, output, activate);
        match signal.load_packet(packet.as_slice(), ACCESSORY_PACKET_REPEATS) {
            Ok(()) => debug!(
                "Accessory {}/{} {} -> [{}]",
                address,
                output,
                u8::from(activate),
                packet
            ),
            Err(e) => warn!(
                "Dropped accessory packet [{}] for {}/{}: {:?}",
                packet, address, output, e
            ),
        }
        packet
    }
}
