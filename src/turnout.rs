//! Turnout entity: identity, accessory addressing, and commanded position.
//!
//! A [`Turnout`] is addressed one of two ways, captured by [`Addressing`]:
//!
//! - **Derived**: created with sub-address `-1`. The entered address is a
//!   linear accessory address and the board address and output index are
//!   computed with [`translate_address`].
//! - **Explicit**: created with a sub-address `0..=3`. The entered address
//!   already names the decoder board and the sub-address is the output.
//!
//! The mode is recomputed on every construction and update, so stale
//! derived values cannot survive an address change.
//!
//! # Example
//!
//! ```rust
//! use trainz_accessories::turnout::{Turnout, TurnoutOrientation};
//!
//! let mut turnout = Turnout::new(5, 12, -1, false, TurnoutOrientation::Left);
//! assert_eq!(turnout.board_address(), 3);
//! assert_eq!(turnout.to_record().sub_address, -1);
//!
//! turnout.set(true);
//! assert!(turnout.is_thrown());
//! assert_eq!(turnout.state_line(), "<H 5 1>");
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dcc::translate_address;
use crate::messages::{state_token, TurnoutRecord, TurnoutStatus};

/// Sub-address value requesting derived board addressing.
pub const DERIVE_SUB_ADDRESS: i8 = -1;

/// Physical shape of a turnout. Informational only; it never changes the
/// packets a turnout sends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum TurnoutOrientation {
    /// Diverging route to the left.
    #[default]
    Left = 0,
    /// Diverging route to the right.
    Right = 1,
    /// Symmetric wye.
    Wye = 2,
    /// Three-way or other multi-route turnout.
    Multi = 3,
}

impl TurnoutOrientation {
    /// Returns the orientation as an uppercase name.
    ///
    /// # Examples
    ///
    /// ```
    /// use trainz_accessories::turnout::TurnoutOrientation;
    ///
    /// assert_eq!(TurnoutOrientation::Left.as_str(), "LEFT");
    /// assert_eq!(TurnoutOrientation::Multi.as_str(), "MULTI");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TurnoutOrientation::Left => "LEFT",
            TurnoutOrientation::Right => "RIGHT",
            TurnoutOrientation::Wye => "WYE",
            TurnoutOrientation::Multi => "MULTI",
        }
    }

    /// Map a stored code to an orientation, `None` if out of range.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TurnoutOrientation::Left),
            1 => Some(TurnoutOrientation::Right),
            2 => Some(TurnoutOrientation::Wye),
            3 => Some(TurnoutOrientation::Multi),
            _ => None,
        }
    }
}

impl From<u8> for TurnoutOrientation {
    fn from(code: u8) -> Self {
        Self::from_code(code).unwrap_or_else(|| {
            warn!("Unknown turnout orientation {}, using LEFT", code);
            TurnoutOrientation::Left
        })
    }
}

impl From<TurnoutOrientation> for u8 {
    fn from(orientation: TurnoutOrientation) -> Self {
        orientation as u8
    }
}

impl fmt::Display for TurnoutOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a turnout's decoder output is located.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Addressing {
    /// Board address and output derived from a linear accessory address.
    Derived {
        /// Decoder board address.
        board_address: u16,
        /// Output on the board.
        board_index: u8,
    },
    /// The turnout address is the board address; `index` is used verbatim.
    Explicit {
        /// Output index as entered.
        index: i8,
    },
}

impl Addressing {
    /// Resolve addressing for an `address`/`index` pair.
    ///
    /// An index of [`DERIVE_SUB_ADDRESS`] derives the board address; any
    /// other value is kept as entered.
    pub fn resolve(address: u16, index: i8) -> Self {
        if index == DERIVE_SUB_ADDRESS {
            let (board_address, board_index) = translate_address(address);
            Addressing::Derived {
                board_address,
                board_index,
            }
        } else {
            Addressing::Explicit { index }
        }
    }
}

/// One track-side switch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turnout {
    id: u16,
    address: u16,
    addressing: Addressing,
    thrown: bool,
    orientation: TurnoutOrientation,
}

impl Turnout {
    /// Create a turnout.
    ///
    /// Pass `index = -1` to derive the board address and output from
    /// `address`.
    pub fn new(
        id: u16,
        address: u16,
        index: i8,
        thrown: bool,
        orientation: TurnoutOrientation,
    ) -> Self {
        let turnout = Self {
            id,
            address,
            addressing: Addressing::resolve(address, index),
            thrown,
            orientation,
        };
        info!("Created {}", turnout);
        turnout
    }

    /// Rebuild a turnout from a persisted record.
    ///
    /// Addressing is derived again from the stored sub-address; the stored
    /// board address is ignored.
    pub fn from_record(record: &TurnoutRecord) -> Self {
        let turnout = Self {
            id: record.id,
            address: record.address,
            addressing: Addressing::resolve(record.address, record.sub_address),
            thrown: record.state,
            orientation: record.orientation,
        };
        info!("Loaded {}", turnout);
        turnout
    }

    /// Change address, sub-address and orientation. Identity and commanded
    /// state are kept.
    pub fn update(&mut self, address: u16, index: i8, orientation: TurnoutOrientation) {
        self.address = address;
        self.addressing = Addressing::resolve(address, index);
        self.orientation = orientation;
        info!("Updated {}", self);
    }

    /// Record a new commanded position.
    ///
    /// This touches in-memory state only. Sending the packet and reporting
    /// the change are separate steps (see [`crate::registry::TurnoutRegistry::set`]),
    /// so restoring saved state does not move hardware.
    pub fn set(&mut self, thrown: bool) {
        self.thrown = thrown;
        debug!("Turnout({}) {}", self.id, state_token(thrown));
    }

    /// Turnout identifier.
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Address as entered.
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Addressing mode.
    pub fn addressing(&self) -> Addressing {
        self.addressing
    }

    /// Derived board address, or 0 for explicit addressing.
    pub fn board_address(&self) -> u16 {
        match self.addressing {
            Addressing::Derived { board_address, .. } => board_address,
            Addressing::Explicit { .. } => 0,
        }
    }

    /// Output index in use: the derived board index or the entered index.
    pub fn index(&self) -> i8 {
        match self.addressing {
            Addressing::Derived { board_index, .. } => board_index as i8,
            Addressing::Explicit { index } => index,
        }
    }

    /// Sub-address as serialized: -1 when a board address was derived,
    /// otherwise the output index.
    ///
    /// Address 0 derives board 0, which is indistinguishable from explicit
    /// addressing in the stored form, so it serializes its index (3) and
    /// reloads as an explicit turnout targeting the same decoder output.
    pub fn sub_address(&self) -> i8 {
        match self.addressing {
            Addressing::Derived { board_address, .. } if board_address != 0 => {
                DERIVE_SUB_ADDRESS
            }
            _ => self.index(),
        }
    }

    /// `true` when thrown, `false` when closed.
    pub fn is_thrown(&self) -> bool {
        self.thrown
    }

    /// Orientation.
    pub fn orientation(&self) -> TurnoutOrientation {
        self.orientation
    }

    /// Decoder address and output that accessory packets target.
    ///
    /// Derived turnouts use the computed board address; explicit turnouts
    /// use the entered address.
    pub fn decoder_target(&self) -> (u16, u8) {
        match self.addressing {
            Addressing::Derived {
                board_address,
                board_index,
            } if board_address != 0 => (board_address, board_index),
            Addressing::Derived { board_index, .. } => (self.address, board_index),
            Addressing::Explicit { index } => (self.address, index as u8),
        }
    }

    /// Persisted form.
    pub fn to_record(&self) -> TurnoutRecord {
        TurnoutRecord {
            id: self.id,
            address: self.address,
            board_address: self.board_address(),
            sub_address: self.sub_address(),
            state: self.thrown,
            orientation: self.orientation,
        }
    }

    /// Readable form with `"THROWN"`/`"CLOSED"` state.
    pub fn to_status(&self) -> TurnoutStatus {
        TurnoutStatus::from(self.to_record())
    }

    /// Serialize as JSON, readable or persisted form.
    pub fn to_json(&self, readable: bool) -> serde_json::Result<serde_json::Value> {
        if readable {
            serde_json::to_value(self.to_status())
        } else {
            serde_json::to_value(self.to_record())
        }
    }

    /// `<H id thrown>` line reported after a state change.
    pub fn state_line(&self) -> String {
        format!("<H {} {}>", self.id, u8::from(self.thrown))
    }

    /// `<H id address subaddress thrown>` line used by listings.
    pub fn status_line(&self) -> String {
        format!(
            "<H {} {} {} {}>",
            self.id,
            self.address,
            self.sub_address(),
            u8::from(self.thrown)
        )
    }
}

impl fmt::Display for Turnout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.addressing {
            Addressing::Derived { .. } => write!(
                f,
                "Turnout({}): DCC Address: {}, orientation: {} ({}), state: {} ({})",
                self.id,
                self.address,
                self.orientation as u8,
                self.orientation,
                u8::from(self.thrown),
                state_token(self.thrown)
            ),
            Addressing::Explicit { index } => write!(
                f,
                "Turnout({}): Address: {}/{}, orientation: {} ({}), state: {} ({})",
                self.id,
                self.address,
                index,
                self.orientation as u8,
                self.orientation,
                u8::from(self.thrown),
                state_token(self.thrown)
            ),
        }
    }
}
