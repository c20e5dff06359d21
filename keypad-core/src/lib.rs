//! Shared scan, hold-classification and keymap logic for the 4×4 keypad.
//!
//! This crate is `no_std`-compatible so it can be used by both the AVR
//! firmware and the native CLI tool. Hardware is reached only through the
//! [`KeypadPins`] and [`KeySink`] traits plus an `embedded_hal` delay, which
//! keeps the whole pipeline runnable against a virtual clock.

#![cfg_attr(not(test), no_std)]

pub mod hold;
pub mod indicator;
pub mod keymap;
pub mod keypad;
pub mod matrix;
pub mod scanner;

pub use hold::{Action, HoldState, Snapshots};
pub use keymap::Key;
pub use keypad::{KeySink, Keypad, Timing};
pub use matrix::KeyMatrix;
pub use scanner::{KeypadPins, Scanner};

/// Number of rows in the matrix.
pub const ROWS: usize = 4;
/// Number of columns in the matrix.
pub const COLS: usize = 4;
