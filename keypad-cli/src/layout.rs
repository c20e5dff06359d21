//! Text rendering of the keypad mapping table.

use keypad_core::indicator;
use keypad_core::keymap::{self, KEYMAP};
use keypad_core::COLS;

/// Width of one cell between the borders.
const CELL: usize = 7;

fn border() -> String {
    let mut line = String::from("+");
    for _ in 0..COLS {
        line.push_str(&"-".repeat(CELL));
        line.push('+');
    }
    line.push('\n');
    line
}

/// Render the table: symbol on the first line of each cell, indicator index
/// and its LED port pattern on the second.
pub fn render() -> String {
    let mut out = String::new();
    out.push_str(&border());

    for row in KEYMAP.iter() {
        out.push('|');
        for key in row {
            out.push_str(&format!("{:^CELL$}|", keymap::symbol_label(key.symbol)));
        }
        out.push('\n');

        out.push('|');
        for key in row {
            let cell = format!("{}:{:02X}", key.indicator, indicator::pattern(key.indicator));
            out.push_str(&format!("{:^CELL$}|", cell));
        }
        out.push('\n');

        out.push_str(&border());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_shape() {
        let text = render();
        let lines: Vec<&str> = text.lines().collect();
        // 4 rows of two lines each, plus 5 borders
        assert_eq!(lines.len(), 13);
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
    }

    #[test]
    fn test_render_contents() {
        let text = render();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].contains("Enter"));
        assert!(lines[2].contains("15:47"));
        assert!(lines[10].contains('/'));
        assert!(lines[11].contains("0:00"));
    }
}
