//! Matrix GPIO for the 4×4 keypad on an ATmega328P.
//!
//! Pin mapping:
//!   Column drive pins: PD2, PD3, PD4, PD5 (Hi-Z when released, low = active)
//!   Row read pins:     PC0, PC1, PC2, PC3 (inputs w/ pull-up)

use avr_device::atmega328p::{PORTC, PORTD};
use keypad_core::KeypadPins;

/// Column 0 sits on PD2.
const COL_SHIFT: usize = 2;
/// PD2-PD5.
const COL_MASK: u8 = 0x3C;
/// PC0-PC3.
const ROW_MASK: u8 = 0x0F;

pub struct MatrixPins {
    portc: PORTC,
    portd: PORTD,
}

impl MatrixPins {
    pub fn new(portc: PORTC, portd: PORTD) -> Self {
        let mut pins = Self { portc, portd };
        pins.release_columns();
        pins
    }

    fn column_bit(col: usize) -> u8 {
        (1u8 << COL_SHIFT) << col
    }
}

impl KeypadPins for MatrixPins {
    fn release_columns(&mut self) {
        // Rows: input with pull-up
        self.portc
            .ddrc
            .modify(|r, w| unsafe { w.bits(r.bits() & !ROW_MASK) });
        self.portc
            .portc
            .modify(|r, w| unsafe { w.bits(r.bits() | ROW_MASK) });

        // Columns: input, no pull-up (Hi-Z)
        self.portd
            .ddrd
            .modify(|r, w| unsafe { w.bits(r.bits() & !COL_MASK) });
        self.portd
            .portd
            .modify(|r, w| unsafe { w.bits(r.bits() & !COL_MASK) });
    }

    fn activate_column(&mut self, col: usize) {
        let bit = Self::column_bit(col);
        self.portd
            .ddrd
            .modify(|r, w| unsafe { w.bits(r.bits() | bit) });
        self.portd
            .portd
            .modify(|r, w| unsafe { w.bits(r.bits() & !bit) });
    }

    fn deactivate_column(&mut self, col: usize) {
        let bit = Self::column_bit(col);
        self.portd
            .ddrd
            .modify(|r, w| unsafe { w.bits(r.bits() | bit) });
        self.portd
            .portd
            .modify(|r, w| unsafe { w.bits(r.bits() | bit) });
    }

    fn read_rows(&mut self) -> u8 {
        self.portc.pinc.read().bits()
    }
}
