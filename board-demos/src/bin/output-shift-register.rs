#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

use arduino_hal::{Delay, Spi};
use bitport::{BitPort, OutputBus, PortError};
use board_demos::{
    halt_on_error, CYCLE_DELAY_MS, SERIAL_BAUD, SHIFT_REGISTERS_NUM, STEP_DELAY_MS,
};
use embedded_hal::{
    blocking::delay::DelayMs,
    spi::{Phase, Polarity},
};
use panic_halt as _;
use ufmt::uWrite;

const LED_0: u8 = 0b0000_0001;
const LED_1: u8 = 0b0000_0010;
const LED_2: u8 = 0b0000_0100;
const LED_3: u8 = 0b0000_1000;
const LED_4: u8 = 0b0001_0000;
const LED_5: u8 = 0b0010_0000;
const LED_6: u8 = 0b0100_0000;
const LED_7: u8 = 0b1000_0000;

#[allow(dead_code)]
enum Demo {
    SingleOutputs,
    BinaryValues,
    DefinedNames,
    CycleLeds,
}
const DEMOS: [Demo; 3] = [Demo::SingleOutputs, Demo::BinaryValues, Demo::DefinedNames];

type Outputs<B> = BitPort<B, SHIFT_REGISTERS_NUM>;

/// Drives one LED through a pin view, costing a full shift of the chain
fn set_led<B: OutputBus, W: uWrite>(outputs: &mut Outputs<B>, serial: &mut W, led: usize, value: bool) {
    let result = outputs
        .pin(led)
        .map_err(PortError::from)
        .and_then(|mut pin| pin.set_value(value));
    halt_on_error(serial, result);
}

fn change_single_outputs<B: OutputBus, W: uWrite, D: DelayMs<u16>>(
    outputs: &mut Outputs<B>,
    serial: &mut W,
    delay: &mut D,
) {
    set_led(outputs, serial, 1, true);
    delay.delay_ms(STEP_DELAY_MS);
    set_led(outputs, serial, 1, false);
    set_led(outputs, serial, 6, true);
    delay.delay_ms(STEP_DELAY_MS);
    set_led(outputs, serial, 6, false);
    delay.delay_ms(STEP_DELAY_MS);

    for led in [0, 2, 4, 6] {
        set_led(outputs, serial, led, true);
    }
    delay.delay_ms(STEP_DELAY_MS);
    for led in [0, 2, 4, 6] {
        set_led(outputs, serial, led, false);
    }
    for led in [1, 3, 5, 7] {
        set_led(outputs, serial, led, true);
    }
    delay.delay_ms(STEP_DELAY_MS);
    for led in [1, 3, 5, 7] {
        set_led(outputs, serial, led, false);
    }
    delay.delay_ms(STEP_DELAY_MS);
}

/// Writes each step of `pattern` to the first chip in one transaction
fn show_pattern<B: OutputBus, W: uWrite, D: DelayMs<u16>>(
    outputs: &mut Outputs<B>,
    serial: &mut W,
    delay: &mut D,
    pattern: &[u8],
) {
    let mut buffer = outputs.buffer();
    for step in pattern {
        buffer[0] = *step;
        halt_on_error(serial, outputs.write_buffer(&buffer));
        delay.delay_ms(STEP_DELAY_MS);
    }
}

fn change_outputs_with_binary_values<B: OutputBus, W: uWrite, D: DelayMs<u16>>(
    outputs: &mut Outputs<B>,
    serial: &mut W,
    delay: &mut D,
) {
    let pattern = [
        0b0000_0010,
        0b0100_0000,
        0b0000_0000,
        0b0101_0101,
        0b1010_1010,
        0b0000_0000,
    ];
    show_pattern(outputs, serial, delay, &pattern);
}

/// Only the named LEDs of a step are lit, every other output goes low
fn change_outputs_with_defined_names<B: OutputBus, W: uWrite, D: DelayMs<u16>>(
    outputs: &mut Outputs<B>,
    serial: &mut W,
    delay: &mut D,
) {
    let pattern = [
        LED_1,
        LED_6,
        0,
        LED_0 | LED_2 | LED_4 | LED_6,
        LED_1 | LED_3 | LED_5 | LED_7,
        0,
    ];
    show_pattern(outputs, serial, delay, &pattern);
}

/// Runs a single lit LED end to end and back, without repeating the LEDs at either end
fn cycle_leds<B: OutputBus, W: uWrite, D: DelayMs<u16>>(
    outputs: &mut Outputs<B>,
    serial: &mut W,
    delay: &mut D,
) {
    let last = outputs.width() - 1;
    for led in (0..last).chain((1..=last).rev()) {
        set_led(outputs, serial, led, true);
        delay.delay_ms(CYCLE_DELAY_MS);
        set_led(outputs, serial, led, false);
    }
}

#[arduino_hal::entry]
fn main() -> ! {
    let peripherals = arduino_hal::Peripherals::take().unwrap();
    let pins = arduino_hal::pins!(peripherals);
    let mut serial = arduino_hal::default_serial!(peripherals, pins, SERIAL_BAUD);

    // SER on MOSI, SRCLK on SCK
    let cs = pins.d10.into_output();
    let mosi = pins.d11.into_output();
    let miso = pins.d12.into_pull_up_input();
    let sck = pins.d13.into_output();
    let mut settings = arduino_hal::spi::Settings::default();
    settings.clock = arduino_hal::spi::SerialClockRate::OscfOver128;
    settings.mode.polarity = Polarity::IdleLow;
    settings.mode.phase = Phase::CaptureOnFirstTransition;
    let (spi, _cs) = Spi::new(peripherals.SPI, sck, mosi, miso, cs, settings);
    let latch = pins.d5.into_output();
    let mut outputs: Outputs<_> = BitPort::hc595(spi, latch);
    let mut delay = Delay::new();

    // Power up leaves the 595 latches undefined
    halt_on_error(&mut serial, outputs.write_buffer(&[0; SHIFT_REGISTERS_NUM]));
    let _ = ufmt::uwriteln!(&mut serial, "Driving {} output pins", outputs.width());
    loop {
        for demo in DEMOS {
            match demo {
                Demo::SingleOutputs => change_single_outputs(&mut outputs, &mut serial, &mut delay),
                Demo::BinaryValues => {
                    change_outputs_with_binary_values(&mut outputs, &mut serial, &mut delay)
                }
                Demo::DefinedNames => {
                    change_outputs_with_defined_names(&mut outputs, &mut serial, &mut delay)
                }
                Demo::CycleLeds => cycle_leds(&mut outputs, &mut serial, &mut delay),
            }
        }
    }
}
