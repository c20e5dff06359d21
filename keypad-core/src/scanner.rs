//! Key matrix scanning.
//!
//! Columns are the drive lines and rows are the read lines. Rows idle high
//! through pull-ups, so a pressed switch in the active column pulls its row
//! low and the raw sample has to be inverted before it lands in the matrix.

use embedded_hal::delay::DelayNs;

use crate::matrix::KeyMatrix;
use crate::{COLS, ROWS};

/// Mask of the row bits inside a raw pin sample.
const ROW_MASK: u8 = (1 << ROWS) - 1;

/// GPIO access needed to sweep the matrix.
pub trait KeypadPins {
    /// Put every column line in its idle state and the rows in pulled-up input mode.
    fn release_columns(&mut self);
    /// Drive `col` to the level that makes a pressed switch readable.
    fn activate_column(&mut self, col: usize);
    /// Drive `col` back to its inactive level.
    fn deactivate_column(&mut self, col: usize);
    /// Raw row pin levels, bit `r` = row `r`. Active low.
    fn read_rows(&mut self) -> u8;
}

pub struct Scanner<P> {
    pins: P,
    debounce_ms: u32,
}

impl<P: KeypadPins> Scanner<P> {
    pub fn new(pins: P, debounce_ms: u32) -> Self {
        Self { pins, debounce_ms }
    }

    pub fn pins(&self) -> &P {
        &self.pins
    }

    pub fn pins_mut(&mut self) -> &mut P {
        &mut self.pins
    }

    /// Sweep all columns in ascending order and return a fresh snapshot.
    ///
    /// Each column waits out the debounce window before it is driven, so a
    /// full scan costs `COLS * debounce_ms`. All columns are inactive on return.
    pub fn scan<D: DelayNs>(&mut self, delay: &mut D) -> KeyMatrix {
        let mut state = KeyMatrix::empty();

        self.pins.release_columns();

        for col in 0..COLS {
            delay.delay_ms(self.debounce_ms);
            self.pins.activate_column(col);

            let rows = !self.pins.read_rows() & ROW_MASK;
            state.set_column(col, rows);

            self.pins.deactivate_column(col);
        }

        state
    }
}
