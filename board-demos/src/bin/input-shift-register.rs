#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

use arduino_hal::Spi;
use bitport::{
    bits::{bit_read, BinaryBytes},
    poll::{ChangeDetector, Sampler},
    BitPort, InputBus,
};
use board_demos::{
    halt_on_error, level, millis, SAMPLE_INTERVAL_MS, SERIAL_BAUD, SHIFT_REGISTERS_NUM,
};
use embedded_hal::spi::{Phase, Polarity};
use panic_halt as _;
use ufmt::uWrite;

/// Switch names, in pin order
const INPUT_NAMES: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

const INPUT_A: usize = 0;
const INPUT_B: usize = 1;
const INPUT_C: usize = 2;
const INPUT_D: usize = 3;
const INPUT_E: usize = 4;
const INPUT_F: usize = 5;
const INPUT_G: usize = 6;
const INPUT_H: usize = 7;

#[allow(dead_code)]
enum Demo {
    SingleInputs,
    BinaryValues,
    DefinedNames,
    PrintOnChange,
}
const DEMO: Demo = Demo::SingleInputs;

type Inputs<B> = BitPort<B, SHIFT_REGISTERS_NUM>;

/// Reads one switch per transaction through a pin view
fn read_single_inputs<B: InputBus, W: uWrite>(inputs: &mut Inputs<B>, serial: &mut W) {
    for (position, name) in INPUT_NAMES.iter().enumerate() {
        let mut input = halt_on_error(serial, inputs.pin(position));
        let value = halt_on_error(serial, input.value());
        let _ = ufmt::uwriteln!(serial, "Input {} = {}", *name, level(value));
    }
    let _ = serial.write_str("\n");
}

/// One transaction for every switch, printed as raw bits
fn read_inputs_with_binary_values<B: InputBus, W: uWrite>(inputs: &mut Inputs<B>, serial: &mut W) {
    let buffer = halt_on_error(serial, inputs.read_buffer());
    let _ = ufmt::uwriteln!(serial, "Inputs: {}", BinaryBytes(&buffer));
}

/// One transaction for every switch, picked apart by name
fn read_inputs_with_defined_names<B: InputBus, W: uWrite>(inputs: &mut Inputs<B>, serial: &mut W) {
    let buffer = halt_on_error(serial, inputs.read_buffer());
    let named = [
        ("A", INPUT_A),
        ("B", INPUT_B),
        ("C", INPUT_C),
        ("D", INPUT_D),
        ("E", INPUT_E),
        ("F", INPUT_F),
        ("G", INPUT_G),
        ("H", INPUT_H),
    ];
    for (name, position) in named {
        let value = bit_read(&buffer, position).unwrap_or(false);
        let _ = ufmt::uwriteln!(serial, "Input {} = {}", name, level(value));
    }
    let _ = serial.write_str("\n");
}

fn read_and_print_inputs_on_change<B: InputBus, W: uWrite>(
    inputs: &mut Inputs<B>,
    detector: &mut ChangeDetector<SHIFT_REGISTERS_NUM>,
    serial: &mut W,
) {
    if let Some(buffer) = halt_on_error(serial, detector.poll(inputs)) {
        let _ = ufmt::uwriteln!(serial, "Inputs: {}", BinaryBytes(&buffer));
    }
}

#[arduino_hal::entry]
fn main() -> ! {
    let peripherals = arduino_hal::Peripherals::take().unwrap();
    let pins = arduino_hal::pins!(peripherals);
    let mut serial = arduino_hal::default_serial!(peripherals, pins, SERIAL_BAUD);

    // QH on MISO, CLK on SCK. MOSI and SS are unused but owned by the SPI peripheral.
    let cs = pins.d10.into_output();
    let mosi = pins.d11.into_output();
    let miso = pins.d12.into_pull_up_input();
    let sck = pins.d13.into_output();
    let mut settings = arduino_hal::spi::Settings::default();
    settings.clock = arduino_hal::spi::SerialClockRate::OscfOver128;
    settings.mode.polarity = Polarity::IdleLow;
    settings.mode.phase = Phase::CaptureOnFirstTransition;
    let (spi, _cs) = Spi::new(peripherals.SPI, sck, mosi, miso, cs, settings);
    let latch = pins.d5.into_output_high();
    let mut inputs: Inputs<_> = BitPort::hc165(spi, latch);

    millis::init(peripherals.TC0);
    unsafe { avr_device::interrupt::enable() };
    let mut sampler = Sampler::new(millis::now, SAMPLE_INTERVAL_MS);
    let mut detector = ChangeDetector::new();

    let _ = ufmt::uwriteln!(&mut serial, "Reading {} input pins", inputs.width());
    loop {
        match DEMO {
            Demo::PrintOnChange => {
                read_and_print_inputs_on_change(&mut inputs, &mut detector, &mut serial)
            }
            Demo::SingleInputs => {
                let _ = nb::block!(sampler.wait());
                read_single_inputs(&mut inputs, &mut serial);
            }
            Demo::BinaryValues => {
                let _ = nb::block!(sampler.wait());
                read_inputs_with_binary_values(&mut inputs, &mut serial);
            }
            Demo::DefinedNames => {
                let _ = nb::block!(sampler.wait());
                read_inputs_with_defined_names(&mut inputs, &mut serial);
            }
        }
    }
}
