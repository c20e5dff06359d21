//! Key state snapshots.

use crate::{COLS, ROWS};

/// One instantaneous scan result, indexed `[row][col]`. `true` = pressed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyMatrix {
    keys: [[bool; COLS]; ROWS],
}

impl KeyMatrix {
    pub const fn empty() -> Self {
        Self {
            keys: [[false; COLS]; ROWS],
        }
    }

    /// Build a matrix with the given `(row, col)` coordinates pressed.
    pub fn from_keys(pressed: &[(usize, usize)]) -> Self {
        let mut matrix = Self::empty();
        for &(row, col) in pressed {
            matrix.set(row, col, true);
        }
        matrix
    }

    pub fn is_pressed(&self, row: usize, col: usize) -> bool {
        self.keys[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, pressed: bool) {
        self.keys[row][col] = pressed;
    }

    /// Store one column's sample. Bit `r` of `rows` is row `r`, active-high.
    pub fn set_column(&mut self, col: usize, rows: u8) {
        for row in 0..ROWS {
            self.keys[row][col] = (rows >> row) & 1 != 0;
        }
    }

    /// Active-high row bits for one column, the inverse of [`set_column`](Self::set_column).
    pub fn column(&self, col: usize) -> u8 {
        let mut rows = 0u8;
        for row in 0..ROWS {
            if self.keys[row][col] {
                rows |= 1 << row;
            }
        }
        rows
    }

    pub fn any_pressed(&self) -> bool {
        self.keys.iter().flatten().any(|&k| k)
    }

    /// Pressed coordinates in emission order: row 3 down to 0, and within a
    /// row column 3 down to 0.
    pub fn pressed_keys(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..ROWS)
            .rev()
            .flat_map(|row| (0..COLS).rev().map(move |col| (row, col)))
            .filter(move |&(row, col)| self.keys[row][col])
    }
}
