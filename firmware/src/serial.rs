//! USART0 transmitter and the PORTB debug LEDs.
//!
//! Both live behind [`KeySink`] so the control loop can blink the
//! indicator and send a symbol through one handle.

use avr_device::atmega328p::{PORTB, USART0};
use keypad_core::KeySink;

/// CPU clock (internal RC with CKDIV8, no prescaler change).
pub const F_CPU: u32 = 1_000_000;
pub const BAUD_RATE: u32 = 9600;
/// Double-speed mode: UBRR = F_CPU / (8 * BAUD) - 1.
const UBRR_VALUE: u16 = (F_CPU / (BAUD_RATE * 8) - 1) as u16;

/// LEDs on PB0, PB1, PB2, PB6.
const LED_MASK: u8 = 0x47;

// UCSR0A / UCSR0B / UCSR0C bits
const U2X0: u8 = 1 << 1;
const UDRE0: u8 = 1 << 5;
const TXEN0: u8 = 1 << 3;
const UCSZ00: u8 = 1 << 1;
const UCSZ01: u8 = 1 << 2;

pub struct SerialSink {
    portb: PORTB,
    usart: USART0,
}

impl SerialSink {
    pub fn new(portb: PORTB, usart: USART0) -> Self {
        portb
            .ddrb
            .modify(|r, w| unsafe { w.bits(r.bits() | LED_MASK) });

        usart
            .ucsr0a
            .modify(|r, w| unsafe { w.bits(r.bits() | U2X0) });
        usart.ubrr0.write(|w| unsafe { w.bits(UBRR_VALUE) });
        usart
            .ucsr0b
            .modify(|r, w| unsafe { w.bits(r.bits() | TXEN0) });
        // 8 data bits, 1 stop bit
        usart
            .ucsr0c
            .modify(|r, w| unsafe { w.bits(r.bits() | UCSZ01 | UCSZ00) });

        Self { portb, usart }
    }
}

impl KeySink for SerialSink {
    fn show_indicator(&mut self, pattern: u8) {
        self.portb.portb.write(|w| unsafe { w.bits(pattern) });
    }

    fn clear_indicator(&mut self) {
        self.portb.portb.write(|w| unsafe { w.bits(0) });
    }

    fn transmit(&mut self, symbol: u8) {
        // Wait for the transmit buffer to drain
        while self.usart.ucsr0a.read().bits() & UDRE0 == 0 {}
        self.usart.udr0.write(|w| unsafe { w.bits(symbol) });
    }
}
