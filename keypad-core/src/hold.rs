//! Repeat detection and tap-versus-hold classification.
//!
//! A "repeat" is any coordinate pressed in two consecutive scans. It is a
//! presence test over the whole matrix, not per-key history, so a second
//! tap of any key that lands while another key is still down reads as a
//! repeat as well.
//!
//! The classifier is available in two shapes:
//! - [`confirm_hold`], a blocking routine that pulls three more scans
//!   through a callback, and
//! - [`HoldState::step`], a pure transition function that consumes one
//!   scan per call and is what the control loop runs.
//!
//! Both produce the same emissions for the same scan sequence.

use crate::matrix::KeyMatrix;
use crate::{COLS, ROWS};

/// Consecutive repeat-positive scans required to confirm a hold.
pub const HOLD_CONFIRM_SCANS: u8 = 3;

/// The previous/current snapshot pair.
///
/// Two owned grids; [`shift`](Self::shift) copies `current` into `previous`
/// and must run before `current` is overwritten by a new scan.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshots {
    pub previous: KeyMatrix,
    pub current: KeyMatrix,
}

impl Snapshots {
    pub const fn new() -> Self {
        Self {
            previous: KeyMatrix::empty(),
            current: KeyMatrix::empty(),
        }
    }

    pub fn shift(&mut self) {
        self.previous = self.current;
    }

    /// Shift, then store `scan` as the new current snapshot.
    pub fn push(&mut self, scan: KeyMatrix) {
        self.shift();
        self.current = scan;
    }

    pub fn has_repeat(&self) -> bool {
        has_repeat(&self.previous, &self.current)
    }
}

/// True iff at least one coordinate is pressed in both snapshots.
pub fn has_repeat(previous: &KeyMatrix, current: &KeyMatrix) -> bool {
    for row in 0..ROWS {
        for col in 0..COLS {
            if previous.is_pressed(row, col) && current.is_pressed(row, col) {
                return true;
            }
        }
    }
    false
}

/// Take [`HOLD_CONFIRM_SCANS`] more scans, shifting the pair before each one.
///
/// Returns false as soon as one scan shows no repeat. The pair is left
/// holding whatever the last scan taken produced.
pub fn confirm_hold<F>(snapshots: &mut Snapshots, mut scan: F) -> bool
where
    F: FnMut() -> KeyMatrix,
{
    for _ in 0..HOLD_CONFIRM_SCANS {
        snapshots.push(scan());
        if !snapshots.has_repeat() {
            return false;
        }
    }
    true
}

/// Classifier state between scans.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum HoldState {
    /// Last top-level scan had nothing pressed.
    #[default]
    Idle,
    /// Last top-level scan was a fresh activation and was emitted.
    PressedOnce,
    /// A repeat was seen; counts repeat-positive confirmation scans so far.
    ConfirmingHold(u8),
    /// Hold confirmed; counts reconfirmation scans since the last emission.
    Holding(u8),
}

/// What the control loop should do with the current snapshot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Nothing,
    /// Fresh activation: emit once.
    Emit,
    /// Hold confirmed: wait the confirmation delay, then emit.
    BeginHold,
    /// Hold reconfirmed: emit again.
    RepeatHold,
}

impl HoldState {
    /// Advance by one scan. `snapshots` must already be shifted and hold the
    /// new scan in `current`.
    pub fn step(self, snapshots: &Snapshots) -> (HoldState, Action) {
        let repeat = snapshots.has_repeat();

        match self {
            HoldState::Idle | HoldState::PressedOnce => {
                if repeat {
                    (HoldState::ConfirmingHold(0), Action::Nothing)
                } else if snapshots.current.any_pressed() {
                    (HoldState::PressedOnce, Action::Emit)
                } else {
                    (HoldState::Idle, Action::Emit)
                }
            }
            HoldState::ConfirmingHold(n) => {
                if !repeat {
                    // Bounce filtered; this scan is not emitted.
                    (HoldState::Idle, Action::Nothing)
                } else if n + 1 >= HOLD_CONFIRM_SCANS {
                    (HoldState::Holding(0), Action::BeginHold)
                } else {
                    (HoldState::ConfirmingHold(n + 1), Action::Nothing)
                }
            }
            HoldState::Holding(n) => {
                if !repeat {
                    (HoldState::Idle, Action::Nothing)
                } else if n + 1 >= HOLD_CONFIRM_SCANS {
                    (HoldState::Holding(0), Action::RepeatHold)
                } else {
                    (HoldState::Holding(n + 1), Action::Nothing)
                }
            }
        }
    }

    /// True once a full top-level cycle has completed.
    pub fn is_at_rest(self) -> bool {
        matches!(self, HoldState::Idle | HoldState::PressedOnce)
    }
}
