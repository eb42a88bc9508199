use embedded_hal::{
    blocking::i2c::{Write, WriteRead},
    digital::v2::InputPin,
};
use log::{debug, trace};

use crate::{
    bits::Bits,
    poll::{InterruptMonitor, IrqState, ServiceError},
    port::{BitPort, InputBus, OutOfRange, OutputBus, PortError},
};

pub mod config;
pub mod registers;

pub use config::{Direction, InterruptConfig, Masks, Mirror, PinConfig, PortConfig, Pull};
pub use registers::{IoCon, Port, Register, DEFAULT_ADDRESS, PIN_COUNT};

/// INTF and INTCAP read back in the same transaction, so the flags and the
/// captured levels always describe the same event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct InterruptSnapshot {
    pub flags: u16,
    pub captured: u16,
}

impl InterruptSnapshot {
    /// Decodes the INTFA, INTFB, INTCAPA, INTCAPB register run
    pub fn from_registers(registers: [u8; 4]) -> InterruptSnapshot {
        Self {
            flags: u16::from_le_bytes([registers[0], registers[1]]),
            captured: u16::from_le_bytes([registers[2], registers[3]]),
        }
    }
    pub fn is_pending(&self) -> bool {
        self.flags != 0
    }
    /// Flags of one port, bit 0 being the port's first pin
    pub fn port_flags(&self, port: Port) -> Bits {
        Bits::new(&self.flags.to_le_bytes()[port.index()])
    }
    /// Captured levels of one port, bit 0 being the port's first pin
    pub fn port_captured(&self, port: Port) -> Bits {
        Bits::new(&self.captured.to_le_bytes()[port.index()])
    }
    /// Level of `pin` when the interrupt fired
    pub fn captured(&self, pin: u8) -> bool {
        pin < PIN_COUNT && self.captured & (1 << pin) != 0
    }
    /// Pins that caused the interrupt, in ascending order
    pub fn flagged_pins(&self) -> impl Iterator<Item = u8> {
        let flags = self.flags;
        (0..PIN_COUNT).filter(move |pin| flags & (1 << pin) != 0)
    }
}

/// Driver for the Microchip MCP23017 16 bit I2C I/O expander
pub struct Mcp23017<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> Mcp23017<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }
    /// Address from the levels of the A0-A2 pins
    pub fn with_address_pins(i2c: I2C, a0: bool, a1: bool, a2: bool) -> Self {
        let address = DEFAULT_ADDRESS | (a0 as u8) | (a1 as u8) << 1 | (a2 as u8) << 2;
        Self::new(i2c, address)
    }
    pub fn address(&self) -> u8 {
        self.address
    }
    pub fn release(self) -> I2C {
        self.i2c
    }
}

fn check_pin(pin: u8) -> Result<u16, OutOfRange> {
    if pin < PIN_COUNT {
        return Ok(1 << pin);
    }
    Err(OutOfRange {
        position: pin as usize,
        width: PIN_COUNT as usize,
    })
}

impl<I2C, E> Mcp23017<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    pub fn read_register(&mut self, reg: Register) -> Result<u8, E> {
        let mut data = [0u8; 1];
        self.i2c.write_read(self.address, &[u8::from(reg)], &mut data)?;
        Ok(data[0])
    }
    pub fn write_register(&mut self, reg: Register, value: u8) -> Result<(), E> {
        self.i2c.write(self.address, &[u8::from(reg), value])
    }
    /// Reads a port A / port B register pair, port A in the low byte
    pub fn read_pair(&mut self, reg: Register) -> Result<u16, E> {
        let mut data = [0u8; 2];
        self.i2c.write_read(self.address, &[u8::from(reg)], &mut data)?;
        Ok(u16::from_le_bytes(data))
    }
    /// Writes a port A / port B register pair, port A in the low byte
    pub fn write_pair(&mut self, reg: Register, value: u16) -> Result<(), E> {
        let [a, b] = value.to_le_bytes();
        self.i2c.write(self.address, &[u8::from(reg), a, b])
    }
    fn update_pair(&mut self, reg: Register, pin: u8, set: bool) -> Result<(), PortError<E>> {
        let mask = check_pin(pin)?;
        let current = self.read_pair(reg).map_err(PortError::Bus)?;
        let value = if set { current | mask } else { current & !mask };
        self.write_pair(reg, value).map_err(PortError::Bus)
    }

    pub fn gpio(&mut self) -> Result<u16, E> {
        self.read_pair(Register::GPIO)
    }
    pub fn set_gpio(&mut self, value: u16) -> Result<(), E> {
        self.write_pair(Register::GPIO, value)
    }
    pub fn gpio_port(&mut self, port: Port) -> Result<u8, E> {
        self.read_register(Register::GPIO.on(port))
    }
    pub fn set_gpio_port(&mut self, port: Port, value: u8) -> Result<(), E> {
        self.write_register(Register::GPIO.on(port), value)
    }
    pub fn olat(&mut self) -> Result<u16, E> {
        self.read_pair(Register::OLAT)
    }
    pub fn iodir(&mut self) -> Result<u16, E> {
        self.read_pair(Register::IODIR)
    }
    pub fn set_iodir(&mut self, value: u16) -> Result<(), E> {
        self.write_pair(Register::IODIR, value)
    }
    pub fn gppu(&mut self) -> Result<u16, E> {
        self.read_pair(Register::GPPU)
    }
    pub fn set_gppu(&mut self, value: u16) -> Result<(), E> {
        self.write_pair(Register::GPPU, value)
    }
    pub fn ipol(&mut self) -> Result<u16, E> {
        self.read_pair(Register::IPOL)
    }
    pub fn set_ipol(&mut self, value: u16) -> Result<(), E> {
        self.write_pair(Register::IPOL, value)
    }
    pub fn gpinten(&mut self) -> Result<u16, E> {
        self.read_pair(Register::GPINTEN)
    }
    pub fn set_gpinten(&mut self, value: u16) -> Result<(), E> {
        self.write_pair(Register::GPINTEN, value)
    }
    pub fn intcon(&mut self) -> Result<u16, E> {
        self.read_pair(Register::INTCON)
    }
    pub fn set_intcon(&mut self, value: u16) -> Result<(), E> {
        self.write_pair(Register::INTCON, value)
    }
    pub fn defval(&mut self) -> Result<u16, E> {
        self.read_pair(Register::DEFVAL)
    }
    pub fn set_defval(&mut self, value: u16) -> Result<(), E> {
        self.write_pair(Register::DEFVAL, value)
    }
    pub fn iocon(&mut self) -> Result<IoCon, E> {
        Ok(IoCon::from_bits(self.read_register(Register::IOCON)?))
    }
    /// IOCONA and IOCONB are the same register, one write covers both ports
    pub fn set_iocon(&mut self, iocon: IoCon) -> Result<(), E> {
        self.write_register(Register::IOCON, iocon.bits())
    }

    pub fn int_flag(&mut self) -> Result<u16, E> {
        self.read_pair(Register::INTF)
    }
    /// Reading the capture registers also clears the interrupt
    pub fn int_cap(&mut self) -> Result<u16, E> {
        self.read_pair(Register::INTCAP)
    }
    /// Reads INTF and INTCAP of both ports in one sequential transaction
    pub fn interrupt_snapshot(&mut self) -> Result<InterruptSnapshot, E> {
        let mut data = [0u8; 4];
        self.i2c
            .write_read(self.address, &[u8::from(Register::INTF)], &mut data)?;
        let snapshot = InterruptSnapshot::from_registers(data);
        trace!(
            "interrupt flags {:#06x} captured {:#06x}",
            snapshot.flags,
            snapshot.captured
        );
        Ok(snapshot)
    }
    /// Releases the interrupt lines. Until this is called the chip keeps its
    /// lines asserted and reports no further changes.
    pub fn clear_interrupts(&mut self) -> Result<(), E> {
        self.int_cap()?;
        Ok(())
    }

    pub fn set_direction(&mut self, pin: u8, direction: Direction) -> Result<(), PortError<E>> {
        self.update_pair(Register::IODIR, pin, direction == Direction::Input)
    }
    pub fn set_pull(&mut self, pin: u8, pull: Pull) -> Result<(), PortError<E>> {
        self.update_pair(Register::GPPU, pin, pull == Pull::Up)
    }
    pub fn set_inverted(&mut self, pin: u8, invert: bool) -> Result<(), PortError<E>> {
        self.update_pair(Register::IPOL, pin, invert)
    }
    /// Latches `value` first so the pin never drives a stale level
    pub fn switch_to_output(&mut self, pin: u8, value: bool) -> Result<(), PortError<E>> {
        self.update_pair(Register::OLAT, pin, value)?;
        self.set_direction(pin, Direction::Output)
    }
    pub fn switch_to_input(&mut self, pin: u8, pull: Pull, invert: bool) -> Result<(), PortError<E>> {
        self.set_direction(pin, Direction::Input)?;
        self.set_pull(pin, pull)?;
        self.set_inverted(pin, invert)
    }
    /// Writes every pin's configuration. Output levels are latched before
    /// the directions change.
    pub fn configure(&mut self, config: &PortConfig) -> Result<(), E> {
        let masks = config.masks();
        debug!(
            "mcp23017 {:#04x}: iodir {:#06x} gppu {:#06x} ipol {:#06x} olat {:#06x}",
            self.address,
            masks.iodir,
            masks.gppu,
            masks.ipol,
            masks.olat
        );
        self.write_pair(Register::OLAT, masks.olat)?;
        self.write_pair(Register::IPOL, masks.ipol)?;
        self.write_pair(Register::GPPU, masks.gppu)?;
        self.write_pair(Register::IODIR, masks.iodir)
    }
    /// Sets up interrupt on change and clears anything already pending
    pub fn configure_interrupts(&mut self, config: &InterruptConfig) -> Result<(), E> {
        debug!(
            "mcp23017 {:#04x}: gpinten {:#06x} intcon {:#06x} defval {:#06x}",
            self.address,
            config.enable,
            config.compare,
            config.default_value
        );
        self.set_iocon(config.iocon)?;
        self.set_defval(config.default_value)?;
        self.set_intcon(config.compare)?;
        self.set_gpinten(config.enable)?;
        self.clear_interrupts()
    }
}

impl<I2C, E> InputBus for Mcp23017<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    type Error = E;
    const BYTES: Option<usize> = Some(2);

    /// Reads GPIOA then GPIOB, one byte each. Ports built on the expander are
    /// always two bytes wide, see [InputBus::BYTES].
    fn read(&mut self, buffer: &mut [u8]) -> Result<(), E> {
        let len = buffer.len().min(2);
        self.i2c
            .write_read(self.address, &[u8::from(Register::GPIO)], &mut buffer[..len])
    }
}

impl<I2C, E> OutputBus for Mcp23017<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    type Error = E;
    const BYTES: Option<usize> = Some(2);

    /// Writes GPIOA then GPIOB
    fn write(&mut self, buffer: &[u8]) -> Result<(), E> {
        let len = buffer.len().min(2);
        let mut frame = [u8::from(Register::GPIO), 0, 0];
        frame[1..=len].copy_from_slice(&buffer[..len]);
        self.i2c.write(self.address, &frame[..=len])
    }
    /// GPIO is readable, so single pin writes start from the real pin state
    fn refresh(&mut self, buffer: &mut [u8]) -> Result<(), E> {
        InputBus::read(self, buffer)
    }
}

/// The 16 expander pins as one port, byte 0 = port A
pub type ExpanderPort<I2C> = BitPort<Mcp23017<I2C>, 2>;

impl<I2C, E> BitPort<Mcp23017<I2C>, 2>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    pub fn mcp23017(i2c: I2C, address: u8) -> Self {
        BitPort::new(Mcp23017::new(i2c, address))
    }
    /// Copies the levels of port `from` onto port `to` with one read and one write
    pub fn copy_port(&mut self, from: Port, to: Port) -> Result<u8, PortError<E>> {
        let value = self.bus.gpio_port(from).map_err(PortError::Bus)?;
        self.bus.set_gpio_port(to, value).map_err(PortError::Bus)?;
        self.buffer[from.index()] = value;
        self.buffer[to.index()] = value;
        Ok(value)
    }
    /// Drives the output mapped to each flagged input with its captured level,
    /// one pin write per flagged input. Returns the number of outputs written.
    pub fn mirror_flagged(
        &mut self,
        snapshot: &InterruptSnapshot,
        mirror: Mirror,
    ) -> Result<usize, PortError<E>> {
        let mut written = 0;
        for pin in snapshot.flagged_pins() {
            if let Some(output) = mirror.target(pin) {
                self.write_bit(output as usize, snapshot.captured(pin))?;
                written += 1;
            }
        }
        Ok(written)
    }
    /// One pass of the interrupt driven mirror loop. When the line is flagged
    /// the snapshot is mirrored, the chip cleared and the monitor acknowledged.
    pub fn service_mirror<INT: InputPin>(
        &mut self,
        monitor: &mut InterruptMonitor<INT>,
        mirror: Mirror,
    ) -> Result<Option<InterruptSnapshot>, ServiceError<E, INT::Error>> {
        if monitor.poll().map_err(ServiceError::Line)? == IrqState::Idle {
            return Ok(None);
        }
        let snapshot = self.bus.interrupt_snapshot().map_err(PortError::Bus)?;
        let written = self.mirror_flagged(&snapshot, mirror)?;
        debug!("mirrored {} flagged inputs", written);
        self.bus.clear_interrupts().map_err(PortError::Bus)?;
        monitor.acknowledge();
        Ok(Some(snapshot))
    }
    /// One pass of the interrupt driven port copy loop. Returns the copied
    /// value when the line was flagged.
    pub fn service_copy<INT: InputPin>(
        &mut self,
        monitor: &mut InterruptMonitor<INT>,
        from: Port,
        to: Port,
    ) -> Result<Option<u8>, ServiceError<E, INT::Error>> {
        if monitor.poll().map_err(ServiceError::Line)? == IrqState::Idle {
            return Ok(None);
        }
        let value = self.copy_port(from, to)?;
        self.bus.clear_interrupts().map_err(PortError::Bus)?;
        monitor.acknowledge();
        Ok(Some(value))
    }
}
