//! Serialized turnout records.
//!
//! These types define the JSON shapes the accessory subsystem reads and
//! writes: the persisted document and the human-readable state export.
//!
//! # Persisted Document
//!
//! ```json
//! {
//!   "count": 1,
//!   "turnouts": [
//!     {"id": 5, "address": 12, "boardAddress": 3, "subAddress": -1, "state": true, "orientation": 0}
//!   ]
//! }
//! ```
//!
//! Fields missing from a stored record default to zero/false so documents
//! written by older firmware still load.

use serde::{Deserialize, Serialize};

use crate::turnout::TurnoutOrientation;

/// Token used for a thrown turnout in readable exports.
pub const STATE_THROWN: &str = "THROWN";

/// Token used for a closed turnout in readable exports.
pub const STATE_CLOSED: &str = "CLOSED";

/// One turnout in the persisted document.
///
/// `board_address` is written for reference only; loading always derives
/// it again from `address` and `sub_address`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TurnoutRecord {
    /// Turnout identifier.
    pub id: u16,
    /// Accessory address as entered.
    pub address: u16,
    /// Derived board address, 0 when `sub_address` is explicit.
    pub board_address: u16,
    /// Output index, or -1 to derive board address and index from `address`.
    pub sub_address: i8,
    /// `true` when thrown.
    pub state: bool,
    /// Orientation code (0-3).
    pub orientation: TurnoutOrientation,
}

/// Readable form of a turnout for state exports.
///
/// Identical to [`TurnoutRecord`] except that `state` is a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnoutStatus {
    /// Turnout identifier.
    pub id: u16,
    /// Accessory address as entered.
    pub address: u16,
    /// Derived board address, 0 when `sub_address` is explicit.
    pub board_address: u16,
    /// Output index, or -1 for derived addressing.
    pub sub_address: i8,
    /// [`STATE_THROWN`] or [`STATE_CLOSED`].
    pub state: String,
    /// Orientation code (0-3).
    pub orientation: TurnoutOrientation,
}

impl From<TurnoutRecord> for TurnoutStatus {
    fn from(record: TurnoutRecord) -> Self {
        Self {
            id: record.id,
            address: record.address,
            board_address: record.board_address,
            sub_address: record.sub_address,
            state: state_token(record.state).to_string(),
            orientation: record.orientation,
        }
    }
}

/// Root of the persisted turnout document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnoutsDocument {
    /// Number of entries in `turnouts`.
    pub count: u16,
    /// Stored turnouts.
    pub turnouts: Vec<TurnoutRecord>,
}

/// Readable token for a thrown flag.
pub fn state_token(thrown: bool) -> &'static str {
    if thrown {
        STATE_THROWN
    } else {
        STATE_CLOSED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uses_camel_case_keys() {
        let record = TurnoutRecord {
            id: 5,
            address: 12,
            board_address: 3,
            sub_address: -1,
            state: true,
            orientation: TurnoutOrientation::Wye,
        };
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 5,
                "address": 12,
                "boardAddress": 3,
                "subAddress": -1,
                "state": true,
                "orientation": 2
            })
        );
    }

    #[test]
    fn record_missing_fields_default() {
        let record: TurnoutRecord = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.address, 0);
        assert_eq!(record.sub_address, 0);
        assert!(!record.state);
        assert_eq!(record.orientation, TurnoutOrientation::Left);
    }

    #[test]
    fn document_missing_count_is_empty() {
        let doc: TurnoutsDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc.count, 0);
        assert!(doc.turnouts.is_empty());
    }

    #[test]
    fn status_from_record_uses_tokens() {
        let status = TurnoutStatus::from(TurnoutRecord {
            id: 1,
            state: false,
            ..Default::default()
        });
        assert_eq!(status.state, STATE_CLOSED);
        assert_eq!(state_token(true), STATE_THROWN);
    }
}
