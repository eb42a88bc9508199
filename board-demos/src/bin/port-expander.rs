#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

use arduino_hal::I2c;
use bitport::{
    mcp23017::{ExpanderPort, InterruptConfig, Mirror, PinConfig, Port, PortConfig, Pull},
    poll::InterruptMonitor,
    PortError,
};
use board_demos::{halt_on_error, level, MCP23017_ADDRESS, SERIAL_BAUD};
use embedded_hal::{
    blocking::i2c::{Write, WriteRead},
    digital::v2::InputPin,
};
use panic_halt as _;
use ufmt::uWrite;

/// LEDs on GPA0-GPA7
const LEDS: core::ops::Range<u8> = 0..8;
/// Switches on GPB0-GPB7
const SWITCHES: core::ops::Range<u8> = 8..16;

#[allow(dead_code)]
enum Setup {
    /// One pin at a time, the way a single GPIO pin is set up
    Pins,
    /// All pins at once from per-pin records
    Ports,
}
const SETUP: Setup = Setup::Ports;

#[allow(dead_code)]
enum Demo {
    PinCopy,
    PortCopy,
    PortCopyOnChange,
    PinCopyOnChange,
}
const DEMO: Demo = Demo::PortCopy;

fn configure_pins<I2C, E, W>(expander: &mut ExpanderPort<I2C>, serial: &mut W)
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    W: uWrite,
{
    for led in LEDS {
        halt_on_error(serial, expander.bus_mut().switch_to_output(led, false));
    }
    for switch in SWITCHES {
        halt_on_error(serial, expander.bus_mut().switch_to_input(switch, Pull::Up, true));
    }
}

/// Port A drives the LEDs, port B reads the switches through inverted pull-ups
fn configure_ports<I2C, E, W>(expander: &mut ExpanderPort<I2C>, serial: &mut W)
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    W: uWrite,
{
    let config = PortConfig::new()
        .set_port(Port::A, PinConfig::output(false))
        .set_port(Port::B, PinConfig::input(Pull::Up, true));
    let result = expander.bus_mut().configure(&config);
    halt_on_error(serial, result.map_err(PortError::Bus));
}

/// Interrupt on any change of a switch, compared against its previous level
fn configure_interrupts<I2C, E, W>(expander: &mut ExpanderPort<I2C>, serial: &mut W)
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    W: uWrite,
{
    let config = InterruptConfig::on_change(0xff00);
    let result = expander.bus_mut().configure_interrupts(&config);
    halt_on_error(serial, result.map_err(PortError::Bus));
}

/// Copies every switch to its LED, one transaction per pin
fn read_and_write_pin<I2C, E, W>(expander: &mut ExpanderPort<I2C>, serial: &mut W)
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    W: uWrite,
{
    for (led, switch) in LEDS.zip(SWITCHES) {
        let value = halt_on_error(serial, expander.read_bit(switch as usize));
        halt_on_error(serial, expander.write_bit(led as usize, value));
    }
}

fn port_copy<I2C, E, W>(expander: &mut ExpanderPort<I2C>, serial: &mut W)
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    W: uWrite,
{
    halt_on_error(serial, expander.copy_port(Port::B, Port::A));
}

fn read_and_write_port_on_input_change<I2C, E, INT, W>(
    expander: &mut ExpanderPort<I2C>,
    monitor: &mut InterruptMonitor<INT>,
    serial: &mut W,
) where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    INT: InputPin,
    W: uWrite,
{
    if let Some(value) = halt_on_error(serial, expander.service_copy(monitor, Port::B, Port::A)) {
        let _ = ufmt::uwriteln!(serial, "Switches: {}", bitport::bits::BinaryBytes(&[value]));
    }
}

/// Only the LEDs of the switches that raised the interrupt are written
fn read_and_write_pin_on_input_change<I2C, E, INT, W>(
    expander: &mut ExpanderPort<I2C>,
    monitor: &mut InterruptMonitor<INT>,
    serial: &mut W,
) where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    INT: InputPin,
    W: uWrite,
{
    let result = expander.service_mirror(monitor, Mirror::PORT_B_TO_A);
    if let Some(snapshot) = halt_on_error(serial, result) {
        let captured = snapshot.port_captured(Port::B);
        for switch in snapshot.port_flags(Port::B).set_indices() {
            let value = captured.is_set(switch as usize);
            let _ = ufmt::uwriteln!(serial, "Switch {} = {}", switch, level(value));
        }
    }
}

#[arduino_hal::entry]
fn main() -> ! {
    let peripherals = arduino_hal::Peripherals::take().unwrap();
    let pins = arduino_hal::pins!(peripherals);
    let mut serial = arduino_hal::default_serial!(peripherals, pins, SERIAL_BAUD);

    let i2c = I2c::new(
        peripherals.TWI,
        pins.a4.into_pull_up_input(),
        pins.a5.into_pull_up_input(),
        50000,
    );
    let mut expander = ExpanderPort::mcp23017(i2c, MCP23017_ADDRESS);
    // INTB, active low
    let mut monitor = InterruptMonitor::new(pins.d5.into_pull_up_input());

    match SETUP {
        Setup::Pins => configure_pins(&mut expander, &mut serial),
        Setup::Ports => configure_ports(&mut expander, &mut serial),
    }
    if let Demo::PortCopyOnChange | Demo::PinCopyOnChange = DEMO {
        configure_interrupts(&mut expander, &mut serial);
    }

    let _ = ufmt::uwriteln!(&mut serial, "MCP23017 at {} ready", expander.bus().address());
    loop {
        match DEMO {
            Demo::PinCopy => read_and_write_pin(&mut expander, &mut serial),
            Demo::PortCopy => port_copy(&mut expander, &mut serial),
            Demo::PortCopyOnChange => {
                read_and_write_port_on_input_change(&mut expander, &mut monitor, &mut serial)
            }
            Demo::PinCopyOnChange => {
                read_and_write_pin_on_input_change(&mut expander, &mut monitor, &mut serial)
            }
        }
    }
}
