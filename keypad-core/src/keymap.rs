//! Key mapping table for the 4×4 keypad.
//!
//! Each matrix position carries the byte sent over the serial line and the
//! debug indicator index shown while it is sent. Indicator indices count
//! down from 15 at (0, 0) to 0 at (3, 3).

use crate::{COLS, ROWS};

/// One entry of the mapping table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Key {
    pub symbol: u8,
    /// Printable name of `symbol`.
    pub label: &'static str,
    pub indicator: u8,
}

const fn k(symbol: u8, label: &'static str, indicator: u8) -> Key {
    Key {
        symbol,
        label,
        indicator,
    }
}

/// Mapping table, indexed `[row][col]`.
pub static KEYMAP: [[Key; COLS]; ROWS] = [
    [k(b'.', ".", 15), k(b'0', "0", 14), k(b'\n', "Enter", 13), k(b'3', "3", 12)],
    [k(b'2', "2", 11), k(b'1', "1", 10), k(b'6', "6", 9), k(b'5', "5", 8)],
    [k(b'4', "4", 7), k(b'+', "+", 6), k(b'9', "9", 5), k(b'8', "8", 4)],
    [k(b'7', "7", 3), k(b'-', "-", 2), k(b'*', "*", 1), k(b'/', "/", 0)],
];

/// Look up the symbol and indicator index for a matrix position.
pub fn encode(row: usize, col: usize) -> (u8, u8) {
    let key = KEYMAP[row][col];
    (key.symbol, key.indicator)
}

/// Table entry that transmits `symbol`, if any.
pub fn find(symbol: u8) -> Option<&'static Key> {
    KEYMAP.iter().flatten().find(|key| key.symbol == symbol)
}

/// Printable label for a transmitted symbol, `"?"` for bytes the keypad never sends.
pub fn symbol_label(symbol: u8) -> &'static str {
    find(symbol).map_or("?", |key| key.label)
}
