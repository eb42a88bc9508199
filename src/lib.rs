//! Before attempting to learn how to use this codebase it is GREATLY recommended
//! to learn [Rust](https://www.rust-lang.org).
//! Once you have installed rust through [Rustup](https://rustup.rs) you can use `cargo doc --open` to
//! view this documention
//!
//! It is highly recommended to familiarize yourself with the following crates:
//! * [embedded_hal](https://docs.rs/embedded-hal/0.2.7/embedded_hal)
//! * [ufmt](https://docs.rs/ufmt/latest/ufmt)
//! * [embedded_hal_mock](https://docs.rs/embedded-hal-mock/0.9.0/embedded_hal_mock) for the tests
//!
//! This crate turns simple I/O chips into fixed width ports whose pins can be
//! addressed one bit at a time:
//! * [74HC165](https://www.ti.com/product/SN74HC165) shift registers for inputs, see [shift::Hc165]
//! * [74HC595](https://www.ti.com/product/SN74HC595) shift registers for outputs, see [shift::Hc595]
//! * the [MCP23017](https://www.microchip.com/en-us/product/MCP23017) I2C expander, see [mcp23017::Mcp23017]
//!
//! Everything is built on the blocking embedded-hal 0.2 traits so the same
//! code runs on the Arduino firmware in `board-demos` and against mocks on the host.
//!
//! Pin `p` of a port is bit `p % 8` of byte `p / 8`. Byte 0 is always the chip
//! nearest the controller, whatever order the chips shift in.

#![cfg_attr(not(test), no_std)]

/// This module contains the [port::BitPort] that maps pin numbers onto a byte buffer and the bus
/// traits a chip implements to back it
pub mod port;

/// Bit and byte helpers shared by the ports and by console output
pub mod bits;

/// This module contains the 74HC165 and 74HC595 shift register buses
pub mod shift;

/// Software SPI on plain GPIO lines, for shift registers wired to pins without an SPI peripheral
pub mod bitbang;

/// This module contains the driver for the MCP23017 I/O expander and its interrupt servicing
pub mod mcp23017;

/// Sampling, change detection and interrupt line polling
pub mod poll;

pub use port::{BitPort, InputBus, OutOfRange, OutputBus, PortError};
