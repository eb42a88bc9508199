//! Before attempting to learn how to use this codebase it is GREATLY recommended
//! to learn [Rust](https://www.rust-lang.org).
//! Once you have installed rust through [Rustup](https://rustup.rs) you can use `cargo doc --open` to
//! view this documention
//!
//! It is highly recommended to familiarize yourself with the following crates:
//! * [arduino_hal](https://rahix.github.io/avr-hal/arduino_hal/index.html)
//! * [embedded_hal](https://docs.rs/embedded_hal/latest/embedded_hal)
//! * [ufmt](https://docs.rs/ufmt/latest/ufmt)
//!
//! This crate holds the Arduino Uno demo programs for the `bitport` crate, one binary per chip:
//! * `input-shift-register`: 8 switches on a 74HC165, SH/LD on D5
//! * `output-shift-register`: 8 LEDs on a 74HC595, RCLK on D5
//! * `port-expander`: 8 LEDs on GPA0-GPA7 and 8 switches on GPB0-GPB7 of an MCP23017, INTB on D5
//!
//! This crate is based off of the [Arduino Hal](https://github.com/Rahix/avr-hal) base framework
//! that provides the correct linker scripts, avrdude integration for USB programming on an Arduino, and ravedude front end for use
//! with `Cargo run` and `Cargo build`
//!
//! NOTE: This crate and its containd binary programs shoud ONLY EVER BE RUN IN RELEASE MODE.

#![no_std]
#![feature(abi_avr_interrupt)]

use ufmt::{uDisplay, uWrite};

/// Baud rate of the USB serial console
pub const SERIAL_BAUD: u32 = 57600;
/// How often the input demos sample their switches, in Hz
pub const SAMPLE_RATE_HZ: f32 = 0.2;
/// [SAMPLE_RATE_HZ] as a sampling interval
pub const SAMPLE_INTERVAL_MS: u32 = (1000.0 / SAMPLE_RATE_HZ + 0.5) as u32;
/// The number of daisy chained shift registers
pub const SHIFT_REGISTERS_NUM: usize = 1;
/// The I2C address of the MCP23017, A0-A2 tied low
pub const MCP23017_ADDRESS: u8 = bitport::mcp23017::DEFAULT_ADDRESS;
/// Pause between the steps of the LED patterns
pub const STEP_DELAY_MS: u16 = 1000;
/// Pause between LEDs while cycling
pub const CYCLE_DELAY_MS: u16 = 100;

/// This module provides a millisecond counter driven by timer 0 of the [Atmega328p](https://www.microchip.com/en-us/product/ATmega328P)
pub mod millis;

/// Unwraps the result of a chip transaction, printing the error to the console and
/// halting the board on failure
pub fn halt_on_error<T, E: uDisplay, W: uWrite>(serial: &mut W, result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            let _ = ufmt::uwriteln!(serial, "Error: {}", err);
            panic!()
        }
    }
}

pub fn level(value: bool) -> &'static str {
    if value {
        "HIGH"
    } else {
        "LOW"
    }
}
