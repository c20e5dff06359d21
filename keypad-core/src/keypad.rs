//! The press → classify → emit control loop.

use embedded_hal::delay::DelayNs;

use crate::hold::{Action, HoldState, Snapshots};
use crate::indicator;
use crate::keymap;
use crate::scanner::{KeypadPins, Scanner};

/// Symbol transmitter plus the debug indicator next to it.
pub trait KeySink {
    /// Write an indicator port pattern (already remapped).
    fn show_indicator(&mut self, pattern: u8);
    fn clear_indicator(&mut self);
    /// Send one byte, blocking until the previous one has gone out.
    fn transmit(&mut self, symbol: u8);
}

/// Fixed waits used by the loop, in milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Wait before driving each column.
    pub debounce_ms: u32,
    /// Wait after each completed scan/emit cycle.
    pub settle_ms: u32,
    /// Wait between confirming a hold and its first emission.
    pub hold_confirm_ms: u32,
    /// Indicator on-time and off-time around each transmitted symbol.
    pub indicator_ms: u32,
    pub self_test_ms: u32,
    pub self_test_gap_ms: u32,
}

impl Timing {
    pub const DEFAULT: Timing = Timing {
        debounce_ms: 15,
        settle_ms: 100,
        hold_confirm_ms: 250,
        indicator_ms: 25,
        self_test_ms: 1000,
        self_test_gap_ms: 100,
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

pub struct Keypad<P, D, S> {
    scanner: Scanner<P>,
    delay: D,
    sink: S,
    timing: Timing,
    snapshots: Snapshots,
    state: HoldState,
}

impl<P, D, S> Keypad<P, D, S>
where
    P: KeypadPins,
    D: DelayNs,
    S: KeySink,
{
    pub fn new(pins: P, delay: D, sink: S, timing: Timing) -> Self {
        Self {
            scanner: Scanner::new(pins, timing.debounce_ms),
            delay,
            sink,
            timing,
            snapshots: Snapshots::new(),
            state: HoldState::Idle,
        }
    }

    pub fn state(&self) -> HoldState {
        self.state
    }

    pub fn pins_mut(&mut self) -> &mut P {
        self.scanner.pins_mut()
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Flash every indicator once.
    pub fn self_test(&mut self) {
        self.sink
            .show_indicator(indicator::pattern(indicator::SELF_TEST_INDEX));
        self.delay.delay_ms(self.timing.self_test_ms);
        self.sink.clear_indicator();
        self.delay.delay_ms(self.timing.self_test_gap_ms);
    }

    /// Take one scan and run it through the classifier.
    pub fn poll(&mut self) -> Action {
        let scan = self.scanner.scan(&mut self.delay);
        self.snapshots.push(scan);

        let (next, action) = self.state.step(&self.snapshots);
        self.state = next;

        match action {
            Action::Nothing => {}
            Action::Emit | Action::RepeatHold => self.emit(),
            Action::BeginHold => {
                self.delay.delay_ms(self.timing.hold_confirm_ms);
                self.emit();
            }
        }

        if self.state.is_at_rest() {
            self.delay.delay_ms(self.timing.settle_ms);
        }

        action
    }

    pub fn run(&mut self) -> ! {
        loop {
            self.poll();
        }
    }

    fn emit(&mut self) {
        let current = self.snapshots.current;
        for (row, col) in current.pressed_keys() {
            let (symbol, index) = keymap::encode(row, col);

            self.sink.show_indicator(indicator::pattern(index));
            self.delay.delay_ms(self.timing.indicator_ms);
            self.sink.clear_indicator();
            self.delay.delay_ms(self.timing.indicator_ms);

            self.sink.transmit(symbol);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::KeyMatrix;
    use crate::scanner::tests::{MockDelay, MockPins};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Indicator(u8),
        Clear,
        Tx(u8),
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<Event>,
    }

    impl RecordingSink {
        fn sent(&self) -> Vec<u8> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Tx(b) => Some(*b),
                    _ => None,
                })
                .collect()
        }
    }

    impl KeySink for RecordingSink {
        fn show_indicator(&mut self, pattern: u8) {
            self.events.push(Event::Indicator(pattern));
        }

        fn clear_indicator(&mut self) {
            self.events.push(Event::Clear);
        }

        fn transmit(&mut self, symbol: u8) {
            self.events.push(Event::Tx(symbol));
        }
    }

    type TestKeypad = Keypad<MockPins, MockDelay, RecordingSink>;

    fn keypad() -> TestKeypad {
        Keypad::new(
            MockPins::new(KeyMatrix::empty()),
            MockDelay::default(),
            RecordingSink::default(),
            Timing::DEFAULT,
        )
    }

    fn feed(keypad: &mut TestKeypad, scans: &[KeyMatrix]) -> Vec<Action> {
        scans
            .iter()
            .map(|&m| {
                keypad.pins_mut().pressed = m;
                keypad.poll()
            })
            .collect()
    }

    #[test]
    fn test_self_test_flashes_all_indicators() {
        let mut kp = keypad();
        kp.self_test();
        assert_eq!(
            kp.sink().events,
            vec![Event::Indicator(0b0100_0111), Event::Clear]
        );
        assert_eq!(kp.delay().elapsed_ms(), 1100);
    }

    #[test]
    fn test_single_press_emits_once() {
        let mut kp = keypad();
        let actions = feed(&mut kp, &[KeyMatrix::from_keys(&[(1, 1)])]);
        assert_eq!(actions, vec![Action::Emit]);
        assert_eq!(
            kp.sink().events,
            vec![Event::Indicator(0b0100_0010), Event::Clear, Event::Tx(b'1')]
        );
        assert_eq!(kp.state(), HoldState::PressedOnce);
    }

    #[test]
    fn test_two_keys_in_one_row_emit_high_column_first() {
        let mut kp = keypad();
        feed(&mut kp, &[KeyMatrix::from_keys(&[(0, 0), (0, 1)])]);
        assert_eq!(kp.sink().sent(), b"0.");
    }

    #[test]
    fn test_opposite_corners_emit_bottom_row_first() {
        let mut kp = keypad();
        feed(&mut kp, &[KeyMatrix::from_keys(&[(0, 0), (3, 3)])]);
        assert_eq!(kp.sink().sent(), b"/.");
    }

    #[test]
    fn test_held_key_repeats_until_release() {
        let mut kp = keypad();
        let nine = KeyMatrix::from_keys(&[(2, 2)]);
        let mut scans = vec![nine; 2 + 3 + 3 + 3];
        scans.push(KeyMatrix::empty());
        feed(&mut kp, &scans);

        // fresh press, hold start, two reconfirmed repeats
        assert_eq!(kp.sink().sent(), b"9999");
        assert_eq!(kp.state(), HoldState::Idle);
    }

    #[test]
    fn test_release_after_hold_is_silent() {
        let mut kp = keypad();
        let nine = KeyMatrix::from_keys(&[(2, 2)]);
        let mut scans = vec![nine; 2 + 3];
        feed(&mut kp, &scans);
        let sent = kp.sink().sent().len();

        scans = vec![KeyMatrix::empty(); 3];
        let actions = feed(&mut kp, &scans);
        assert_eq!(actions[0], Action::Nothing);
        assert_eq!(kp.sink().sent().len(), sent);
        assert!(kp.state().is_at_rest());
    }

    #[test]
    fn test_bounce_during_confirmation_drops_output() {
        let mut kp = keypad();
        let one = KeyMatrix::from_keys(&[(1, 1)]);
        feed(&mut kp, &[one, one, KeyMatrix::empty()]);
        assert_eq!(kp.sink().sent(), b"1");
    }

    #[test]
    fn test_hold_confirmation_delay_precedes_first_hold_emission() {
        let mut kp = keypad();
        let nine = KeyMatrix::from_keys(&[(2, 2)]);
        feed(&mut kp, &[nine; 4]);
        let before = kp.delay().elapsed_ms();
        let action = feed(&mut kp, &[nine])[0];
        assert_eq!(action, Action::BeginHold);
        // one scan, the confirmation delay and one indicator blink
        assert_eq!(kp.delay().elapsed_ms() - before, 60 + 250 + 50);
    }

    #[test]
    fn test_settle_delay_only_at_rest() {
        let mut kp = keypad();
        let nine = KeyMatrix::from_keys(&[(2, 2)]);

        feed(&mut kp, &[KeyMatrix::empty()]);
        assert_eq!(kp.delay().elapsed_ms(), 60 + 100);

        feed(&mut kp, &[nine]);
        let before = kp.delay().elapsed_ms();
        feed(&mut kp, &[nine]);
        assert_eq!(kp.state(), HoldState::ConfirmingHold(0));
        assert_eq!(kp.delay().elapsed_ms() - before, 60);
    }

    #[test]
    fn test_custom_debounce_window() {
        let timing = Timing {
            debounce_ms: 1,
            ..Timing::DEFAULT
        };
        let mut kp = Keypad::new(
            MockPins::new(KeyMatrix::empty()),
            MockDelay::default(),
            RecordingSink::default(),
            timing,
        );
        kp.poll();
        assert_eq!(kp.delay().elapsed_ms(), 4 + 100);
    }
}
