//! Debug indicator output patterns.
//!
//! The four indicator LEDs sit on port bits 0, 1, 2 and 6. Bit 3 of the
//! port is not an LED, so an index with bit 3 set has that bit moved to
//! bit 6 before it is written.

/// Index shown during the power-on self-test (all four LEDs).
pub const SELF_TEST_INDEX: u8 = 0xF;

/// Port pattern for an indicator index in `0..=15`.
pub const fn pattern(index: u8) -> u8 {
    if (index >> 3) & 1 != 0 {
        (index & 0b1111_0111) | 0b0100_0000
    } else {
        index
    }
}
