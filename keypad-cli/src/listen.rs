use anyhow::{Context, Result};
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use keypad_core::keymap;
use std::io::{self, ErrorKind, Read, Write};
use std::time::Duration;

/// How long one blocking read waits before looping again.
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Somewhere to type host keystrokes.
pub trait Keystrokes {
    fn click(&mut self, key: Key) -> Result<()>;
}

impl Keystrokes for Enigo {
    fn click(&mut self, key: Key) -> Result<()> {
        self.key(key, Direction::Click)
            .with_context(|| format!("failed to press {:?}", key))
    }
}

/// Host key for a symbol received from the keypad.
///
/// Only bytes from the keymap are accepted; everything else is line noise.
pub fn host_key(byte: u8) -> Option<Key> {
    let key = keymap::find(byte)?;
    Some(match key.symbol {
        b'\n' => Key::Return,
        symbol => Key::Unicode(char::from(symbol)),
    })
}

/// Turns received bytes into keystrokes, echoing them when asked.
pub struct Listener<K, W> {
    keys: K,
    echo: Option<W>,
}

impl<K: Keystrokes, W: Write> Listener<K, W> {
    pub fn new(keys: K, echo: Option<W>) -> Self {
        Self { keys, echo }
    }

    pub fn handle(&mut self, byte: u8) -> Result<()> {
        let Some(key) = host_key(byte) else {
            log::debug!("ignoring byte 0x{:02X}", byte);
            return Ok(());
        };

        log::info!("key {}", keymap::symbol_label(byte));
        if let Some(out) = self.echo.as_mut() {
            out.write_all(&[byte]).context("writing to stdout")?;
            out.flush().context("flushing stdout")?;
        }
        self.keys.click(key)
    }
}

/// Type keystrokes from the keypad on the host until the port goes away.
pub fn run(path: &str, baud: u32, verbose: bool) -> Result<()> {
    let mut port = serialport::new(path, baud)
        .timeout(READ_TIMEOUT)
        .open()
        .with_context(|| format!("failed to open serial port {}", path))?;

    let enigo =
        Enigo::new(&Settings::default()).context("failed to connect to the host input system")?;
    let echo = verbose.then(io::stdout);
    let mut listener = Listener::new(enigo, echo);

    log::info!("listening on {} at {} baud", path, baud);

    let mut buf = [0u8; 1];
    loop {
        match port.read(&mut buf) {
            Ok(0) => continue,
            Ok(_) => listener.handle(buf[0])?,
            Err(e) if e.kind() == ErrorKind::TimedOut => continue,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).with_context(|| format!("reading from {}", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordedKeys {
        pressed: Vec<Key>,
    }

    impl Keystrokes for &mut RecordedKeys {
        fn click(&mut self, key: Key) -> Result<()> {
            self.pressed.push(key);
            Ok(())
        }
    }

    #[test]
    fn test_host_key_mapping() {
        assert_eq!(host_key(b'\n'), Some(Key::Return));
        assert_eq!(host_key(b'5'), Some(Key::Unicode('5')));
        assert_eq!(host_key(b'/'), Some(Key::Unicode('/')));
    }

    #[test]
    fn test_every_keypad_symbol_maps_to_a_host_key() {
        for symbol in b".0123456789+-*/\n" {
            assert!(host_key(*symbol).is_some(), "{}", symbol);
        }
    }

    #[test]
    fn test_unknown_bytes_are_ignored() {
        assert_eq!(host_key(b'a'), None);
        assert_eq!(host_key(0x80), None);
        assert_eq!(host_key(0xFF), None);
    }

    #[test]
    fn test_handle_types_keys_without_echo() {
        let mut keys = RecordedKeys::default();
        let mut listener: Listener<_, Vec<u8>> = Listener::new(&mut keys, None);
        for byte in b"12\n\xFF" {
            listener.handle(*byte).unwrap();
        }
        assert!(listener.echo.is_none());
        drop(listener);
        assert_eq!(
            keys.pressed,
            vec![Key::Unicode('1'), Key::Unicode('2'), Key::Return]
        );
    }

    #[test]
    fn test_handle_echoes_when_verbose() {
        let mut keys = RecordedKeys::default();
        let mut listener = Listener::new(&mut keys, Some(Vec::new()));
        for byte in b"9+x" {
            listener.handle(*byte).unwrap();
        }
        assert_eq!(listener.echo.as_deref(), Some(&b"9+"[..]));
        drop(listener);
        assert_eq!(keys.pressed, vec![Key::Unicode('9'), Key::Unicode('+')]);
    }
}
