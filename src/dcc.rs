//! DCC accessory addressing and packet encoding.
//!
//! This module contains the two pure building blocks of accessory control:
//!
//! - [`translate_address`] maps a linear accessory address to a decoder
//!   board address and the output index on that board
//! - [`AccessoryPacket`] builds the two-byte basic accessory decoder packet
//!
//! # Packet Layout
//!
//! ```text
//! byte0: 10AAAAAA   six least significant bits of the board address
//! byte1: 1aaa1DDC   inverted high address bits (^0xF8), output DD, activate C
//! ```
//!
//! # Example
//!
//! ```rust
//! use trainz_accessories::dcc::{translate_address, AccessoryPacket};
//!
//! let (board, index) = translate_address(12);
//! assert_eq!((board, index), (3, 3));
//!
//! let packet = AccessoryPacket::new(board, index, true);
//! assert_eq!(packet.bytes(), [0x83, 0xFF]);
//! ```

use core::fmt;

/// Number of outputs on one accessory decoder board.
pub const OUTPUTS_PER_BOARD: u16 = 4;

/// Highest accessory address accepted by the text protocol.
pub const MAX_ACCESSORY_ADDRESS: u16 = 511;

/// Repeat count handed to the track signal for each accessory packet.
pub const ACCESSORY_PACKET_REPEATS: u8 = 1;

/// Convert a linear DCC accessory address into `(board_address, board_index)`.
///
/// The arithmetic is kept exactly as existing stations compute it, since
/// persisted layouts and paired decoders depend on the resulting numbers:
///
/// ```text
/// board_address = (address + 3) / 4
/// board_index   = (address - board_address * 4) + 3
/// ```
///
/// Both steps are evaluated at `i32` width and then truncated to the field
/// widths, so no address in `0..=u16::MAX` overflows.
///
/// # Examples
///
/// ```
/// use trainz_accessories::dcc::translate_address;
///
/// assert_eq!(translate_address(0), (0, 3));
/// assert_eq!(translate_address(1), (1, 0));
/// assert_eq!(translate_address(4), (1, 3));
/// assert_eq!(translate_address(5), (2, 0));
/// ```
pub fn translate_address(address: u16) -> (u16, u8) {
    let address = i32::from(address);
    let board_address = (address + 3) / 4;
    let board_index = (address - board_address * 4) + 3;
    (board_address as u16, board_index as u8)
}

/// A two-byte basic accessory decoder packet.
///
/// Construction is total: every `(address, output, activate)` triple maps
/// to a packet. Address bits above the nine the format carries are
/// discarded, as are output bits above two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AccessoryPacket {
    bytes: [u8; 2],
}

impl AccessoryPacket {
    /// Encode a packet for `output` on the decoder at `address`.
    pub fn new(address: u16, output: u8, activate: bool) -> Self {
        let byte0 = 0x80 + (address % 64) as u8;
        let high = ((address / 64) % 8) as u8;
        let byte1 = ((high << 4) + ((output % 4) << 1) + u8::from(activate)) ^ 0xF8;
        Self {
            bytes: [byte0, byte1],
        }
    }

    /// Raw packet bytes, without checksum.
    #[inline]
    pub const fn bytes(&self) -> [u8; 2] {
        self.bytes
    }

    /// Borrow the packet bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Decoder address the packet targets.
    pub fn address(&self) -> u16 {
        let low = u16::from(self.bytes[0] & 0x3F);
        let high = u16::from(((self.bytes[1] ^ 0xF8) >> 4) & 0x07);
        (high << 6) | low
    }

    /// Output index on the decoder.
    pub fn output(&self) -> u8 {
        ((self.bytes[1] ^ 0xF8) >> 1) & 0x03
    }

    /// Whether the output is activated.
    pub fn is_activate(&self) -> bool {
        (self.bytes[1] & 0x01) == 1
    }
}

impl fmt::Display for AccessoryPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X}", self.bytes[0], self.bytes[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // translate_address
    // =========================================================================

    #[test]
    fn translate_known_table() {
        // (address, board_address, board_index) computed from the formula
        let table: [(u16, u16, u8); 14] = [
            (0, 0, 3),
            (1, 1, 0),
            (2, 1, 1),
            (3, 1, 2),
            (4, 1, 3),
            (5, 2, 0),
            (8, 2, 3),
            (9, 3, 0),
            (12, 3, 3),
            (13, 4, 0),
            (100, 25, 3),
            (256, 64, 3),
            (510, 128, 1),
            (511, 128, 2),
        ];
        for (address, board, index) in table {
            assert_eq!(
                translate_address(address),
                (board, index),
                "address {}",
                address
            );
        }
    }

    #[test]
    fn translate_index_always_on_board() {
        for address in 0..=MAX_ACCESSORY_ADDRESS {
            let (_, index) = translate_address(address);
            assert!(index < OUTPUTS_PER_BOARD as u8, "address {}", address);
        }
    }

    #[test]
    fn translate_does_not_overflow_at_u16_max() {
        assert_eq!(translate_address(u16::MAX), (16384, 2));
    }

    // =========================================================================
    // AccessoryPacket
    // =========================================================================

    #[test]
    fn encode_address_one_activate() {
        assert_eq!(AccessoryPacket::new(1, 0, true).bytes(), [0x81, 0xF9]);
    }

    #[test]
    fn encode_zero_deactivate() {
        assert_eq!(AccessoryPacket::new(0, 0, false).bytes(), [0x80, 0xF8]);
    }

    #[test]
    fn encode_address_twelve() {
        assert_eq!(AccessoryPacket::new(12, 0, true).bytes(), [0x8C, 0xF9]);
    }

    #[test]
    fn encode_high_address_bits() {
        // 100 = 0b01_100100 -> high bits 1, low bits 36
        assert_eq!(AccessoryPacket::new(100, 2, false).bytes(), [0xA4, 0xEC]);
        assert_eq!(AccessoryPacket::new(511, 3, true).bytes(), [0xBF, 0x8F]);
    }

    #[test]
    fn encode_output_wraps_modulo_four() {
        assert_eq!(
            AccessoryPacket::new(7, 6, true),
            AccessoryPacket::new(7, 2, true)
        );
    }

    #[test]
    fn encode_address_wraps_above_nine_bits() {
        assert_eq!(
            AccessoryPacket::new(512 + 17, 1, false),
            AccessoryPacket::new(17, 1, false)
        );
    }

    #[test]
    fn packet_fields_decode() {
        let packet = AccessoryPacket::new(300, 1, true);
        assert_eq!(packet.address(), 300);
        assert_eq!(packet.output(), 1);
        assert!(packet.is_activate());
    }

    #[test]
    fn packet_display_hex() {
        assert_eq!(AccessoryPacket::new(1, 0, true).to_string(), "81 F9");
    }
}
