use anyhow::{bail, Context, Result};
use embedded_hal::delay::DelayNs;
use keypad_core::{keymap, KeyMatrix, KeySink, Keypad, KeypadPins, Timing, COLS, ROWS};
use std::cell::Cell;
use std::rc::Rc;

/// Mask of the row bits inside a raw pin sample.
const ROW_MASK: u8 = (1 << ROWS) - 1;

/// Largest `xN` a script line may carry.
const MAX_REPEAT: usize = 10_000;

/// A symbol transmitted during the simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub at_ms: u64,
    pub symbol: u8,
}

impl Sent {
    pub fn label(&self) -> &'static str {
        keymap::symbol_label(self.symbol)
    }
}

/// Parse a scan script into one matrix per scan.
///
/// Each non-blank line is one scan: whitespace-separated `row,col` pairs,
/// or `-` for nothing pressed. A trailing `xN` repeats the scan N times.
/// `#` starts a comment.
pub fn parse_script(input: &str) -> Result<Vec<KeyMatrix>> {
    let mut scans = Vec::new();

    for (line_num, line) in input.lines().enumerate() {
        let line = match line.split_once('#') {
            Some((code, _)) => code,
            None => line,
        }
        .trim();
        if line.is_empty() {
            continue;
        }

        let (matrix, count) =
            parse_line(line).with_context(|| format!("line {}", line_num + 1))?;
        for _ in 0..count {
            scans.push(matrix);
        }
    }

    Ok(scans)
}

fn parse_line(line: &str) -> Result<(KeyMatrix, usize)> {
    let mut matrix = KeyMatrix::empty();
    let mut count: Option<usize> = None;
    let mut blank = false;

    for token in line.split_whitespace() {
        if token == "-" {
            if blank || matrix.any_pressed() {
                bail!("'-' cannot be combined with other keys");
            }
            blank = true;
            continue;
        }
        if let Some(n) = token.strip_prefix('x') {
            if count.is_some() {
                bail!("more than one repeat count on the line");
            }
            let n: usize = n
                .parse()
                .with_context(|| format!("invalid repeat count '{}'", token))?;
            if n == 0 || n > MAX_REPEAT {
                bail!("repeat count {} is outside 1..={}", n, MAX_REPEAT);
            }
            count = Some(n);
            continue;
        }

        if blank {
            bail!("'-' cannot be combined with other keys");
        }
        let Some((row, col)) = token.split_once(',') else {
            bail!("expected row,col but found '{}'", token);
        };
        let row: usize = row
            .parse()
            .with_context(|| format!("invalid row in '{}'", token))?;
        let col: usize = col
            .parse()
            .with_context(|| format!("invalid column in '{}'", token))?;
        if row >= ROWS || col >= COLS {
            bail!("key {},{} is outside the {}x{} matrix", row, col, ROWS, COLS);
        }
        matrix.set(row, col, true);
    }

    Ok((matrix, count.unwrap_or(1)))
}

/// Pins that present one scripted matrix as active-low row levels.
#[derive(Default)]
struct ScriptedPins {
    frame: KeyMatrix,
    active: Option<usize>,
}

impl KeypadPins for ScriptedPins {
    fn release_columns(&mut self) {
        self.active = None;
    }

    fn activate_column(&mut self, col: usize) {
        self.active = Some(col);
    }

    fn deactivate_column(&mut self, _col: usize) {
        self.active = None;
    }

    fn read_rows(&mut self) -> u8 {
        let rows = self.active.map_or(0, |col| self.frame.column(col));
        !rows | !ROW_MASK
    }
}

/// Simulated clock, shared with the sink so symbols are stamped when sent.
#[derive(Clone, Default)]
struct VirtualClock {
    elapsed_ns: Rc<Cell<u64>>,
}

impl VirtualClock {
    fn now_ms(&self) -> u64 {
        self.elapsed_ns.get() / 1_000_000
    }
}

impl DelayNs for VirtualClock {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns.set(self.elapsed_ns.get() + u64::from(ns));
    }
}

struct CaptureSink {
    clock: VirtualClock,
    sent: Vec<Sent>,
}

impl KeySink for CaptureSink {
    fn show_indicator(&mut self, _pattern: u8) {}

    fn clear_indicator(&mut self) {}

    fn transmit(&mut self, symbol: u8) {
        self.sent.push(Sent {
            at_ms: self.clock.now_ms(),
            symbol,
        });
    }
}

/// Feed each scripted scan to the keypad pipeline and collect what it sends.
pub fn run(scans: &[KeyMatrix], timing: Timing) -> Vec<Sent> {
    let clock = VirtualClock::default();
    let sink = CaptureSink {
        clock: clock.clone(),
        sent: Vec::new(),
    };
    let mut keypad = Keypad::new(ScriptedPins::default(), clock, sink, timing);

    for (i, scan) in scans.iter().enumerate() {
        keypad.pins_mut().frame = *scan;
        let before = keypad.state();
        let action = keypad.poll();
        log::debug!(
            "scan {} at {} ms: {:?} -> {:?} ({:?})",
            i,
            keypad.delay().now_ms(),
            before,
            keypad.state(),
            action
        );
    }

    std::mem::take(&mut keypad.sink_mut().sent)
}
