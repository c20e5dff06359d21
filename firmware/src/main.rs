//! 4×4 keypad firmware for ATmega328P.
//!
//! Scans the key matrix, separates taps from holds and sends one ASCII
//! symbol per activation over USART0 at 9600 baud. The four LEDs on PORTB
//! blink the key's indicator index while its symbol goes out.

#![no_std]
#![no_main]
#![feature(asm_experimental_arch)]

mod delay;
mod matrix;
mod serial;

use avr_device::atmega328p::Peripherals;
use keypad_core::{Keypad, Timing};

use delay::BusyDelay;
use matrix::MatrixPins;
use serial::SerialSink;

/// Panic handler — on AVR we just loop forever.
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {}
}

/// Main entry point.
#[no_mangle]
pub extern "C" fn main() -> ! {
    let dp = unsafe { Peripherals::steal() };

    let pins = MatrixPins::new(dp.PORTC, dp.PORTD);
    let sink = SerialSink::new(dp.PORTB, dp.USART0);

    let mut keypad = Keypad::new(pins, BusyDelay, sink, Timing::DEFAULT);

    // Flash all LEDs to show the board is alive
    keypad.self_test();

    keypad.run()
}
