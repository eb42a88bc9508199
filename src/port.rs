use embedded_hal::digital::v2::{OutputPin, StatefulOutputPin, ToggleableOutputPin};
use log::trace;
use ufmt::{uDisplay, uWrite, Formatter};

use crate::bits::{bit_read, bit_write};

/// A chip whose pins can be sampled in one transaction
pub trait InputBus {
    type Error;
    /// Fills the whole of `buffer` with the current pin levels, byte 0 being the
    /// chip nearest the controller
    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error>;
    /// Number of bytes a chip with a fixed pin count holds. `None` for chains
    /// of any length.
    const BYTES: Option<usize> = None;
}

/// A chip whose pins can be driven in one transaction
pub trait OutputBus {
    type Error;
    /// Drives every pin from `buffer`, byte 0 being the chip nearest the controller
    fn write(&mut self, buffer: &[u8]) -> Result<(), Self::Error>;
    /// Number of bytes a chip with a fixed pin count holds. `None` for chains
    /// of any length.
    const BYTES: Option<usize> = None;
    /// Reloads `buffer` with the chip's current output state before a single
    /// bit is modified. Chips without a read path keep the buffer as it is,
    /// the last written state being the only record of their outputs.
    fn refresh(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        let _ = buffer;
        Ok(())
    }
}

/// A pin position past the end of the port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    pub position: usize,
    pub width: usize,
}

impl uDisplay for OutOfRange {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str("pin ")?;
        <usize as uDisplay>::fmt(&self.position, f)?;
        f.write_str(" out of range for a ")?;
        <usize as uDisplay>::fmt(&self.width, f)?;
        f.write_str(" pin port")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError<E> {
    /// The pin position is not in `0..width`. Nothing was sent to the chip.
    OutOfRange(OutOfRange),
    /// A buffer write did not carry exactly one byte per chip, or the port is
    /// wider or narrower than its chip. Nothing was sent to the chip.
    LengthMismatch { expected: usize, actual: usize },
    /// The transaction itself failed
    Bus(E),
}

impl<E> From<OutOfRange> for PortError<E> {
    fn from(err: OutOfRange) -> Self {
        PortError::OutOfRange(err)
    }
}

impl<E> uDisplay for PortError<E> {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            PortError::OutOfRange(err) => <OutOfRange as uDisplay>::fmt(err, f),
            PortError::LengthMismatch { expected, actual } => {
                f.write_str("buffer of ")?;
                <usize as uDisplay>::fmt(actual, f)?;
                f.write_str(" bytes given, port holds ")?;
                <usize as uDisplay>::fmt(expected, f)
            }
            PortError::Bus(_) => f.write_str("bus transaction failed"),
        }
    }
}

/// A port wraps a fixed size chip only when it is exactly as wide as the chip
fn check_chip<E>(bytes: Option<usize>, actual: usize) -> Result<(), PortError<E>> {
    match bytes {
        Some(expected) if expected != actual => Err(PortError::LengthMismatch { expected, actual }),
        _ => Ok(()),
    }
}

/// A fixed width digital port made of `N` daisy chained 8 bit registers.
///
/// Pin `p` lives in byte `p / 8`, bit `p % 8` (bit 0 is the least significant)
/// and byte 0 is the chip nearest the controller.
///
/// Every per-pin access is a full transaction on the whole chain. Reading or
/// writing the whole buffer costs a single transaction no matter how many pins change.
pub struct BitPort<B, const N: usize> {
    pub(crate) bus: B,
    pub(crate) buffer: [u8; N],
}

impl<B, const N: usize> BitPort<B, N> {
    /// Number of pins on the port
    pub const WIDTH: usize = 8 * N;

    /// Wraps a chip, assuming every output starts low. No transaction is made.
    pub fn new(bus: B) -> Self {
        Self::with_buffer(bus, [0; N])
    }
    /// Wraps a chip whose pins are already known to be in `buffer`'s state
    pub fn with_buffer(bus: B, buffer: [u8; N]) -> Self {
        Self { bus, buffer }
    }
    pub fn width(&self) -> usize {
        Self::WIDTH
    }
    /// The last buffer read from or written to the chip. Makes no transaction.
    pub fn buffer(&self) -> [u8; N] {
        self.buffer
    }
    pub fn bus(&self) -> &B {
        &self.bus
    }
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
    pub fn release(self) -> B {
        self.bus
    }
    /// Checks `position` against the port width
    pub fn check(&self, position: usize) -> Result<(), OutOfRange> {
        if position < Self::WIDTH {
            return Ok(());
        }
        Err(OutOfRange {
            position,
            width: Self::WIDTH,
        })
    }
    /// Borrows a single pin. The reference can't outlive the port, so every
    /// access through it goes through the port's transactions.
    pub fn pin(&mut self, position: usize) -> Result<Pin<'_, B, N>, OutOfRange> {
        self.check(position)?;
        Ok(Pin {
            port: self,
            position,
        })
    }
    fn cached_bit(&self, position: usize) -> Result<bool, OutOfRange> {
        self.check(position)?;
        bit_read(&self.buffer, position).ok_or(OutOfRange {
            position,
            width: Self::WIDTH,
        })
    }
}

impl<B: InputBus, const N: usize> BitPort<B, N> {
    /// Samples the whole chain in one transaction and returns a copy of it
    pub fn read_buffer(&mut self) -> Result<[u8; N], PortError<B::Error>> {
        check_chip(<B as InputBus>::BYTES, N)?;
        let mut buffer = [0u8; N];
        self.bus.read(&mut buffer).map_err(PortError::Bus)?;
        trace!("port read {:02x?}", buffer);
        self.buffer = buffer;
        Ok(buffer)
    }
    /// Samples the whole chain and extracts one pin
    pub fn read_bit(&mut self, position: usize) -> Result<bool, PortError<B::Error>> {
        self.check(position)?;
        let buffer = self.read_buffer()?;
        bit_read(&buffer, position).ok_or(PortError::OutOfRange(OutOfRange {
            position,
            width: Self::WIDTH,
        }))
    }
}

impl<B: OutputBus, const N: usize> BitPort<B, N> {
    /// Drives the whole chain from `buffer` in one transaction
    pub fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), PortError<B::Error>> {
        if buffer.len() != N {
            return Err(PortError::LengthMismatch {
                expected: N,
                actual: buffer.len(),
            });
        }
        check_chip(<B as OutputBus>::BYTES, N)?;
        self.bus.write(buffer).map_err(PortError::Bus)?;
        trace!("port wrote {:02x?}", buffer);
        self.buffer.copy_from_slice(buffer);
        Ok(())
    }
    /// Sets or clears one pin, leaving every other pin at its previous value
    pub fn write_bit(&mut self, position: usize, value: bool) -> Result<(), PortError<B::Error>> {
        self.modify_bit(position, |_| value)
    }
    /// Inverts one pin, leaving every other pin at its previous value
    pub fn toggle_bit(&mut self, position: usize) -> Result<(), PortError<B::Error>> {
        self.modify_bit(position, |current| !current)
    }
    fn modify_bit(
        &mut self,
        position: usize,
        f: impl FnOnce(bool) -> bool,
    ) -> Result<(), PortError<B::Error>> {
        self.check(position)?;
        check_chip(<B as OutputBus>::BYTES, N)?;
        let mut buffer = self.buffer;
        self.bus.refresh(&mut buffer).map_err(PortError::Bus)?;
        let out_of_range = OutOfRange {
            position,
            width: Self::WIDTH,
        };
        let current = bit_read(&buffer, position).ok_or(out_of_range)?;
        bit_write(&mut buffer, position, f(current)).ok_or(out_of_range)?;
        self.write_buffer(&buffer)
    }
}

/// A transient view of one pin of a [BitPort]
pub struct Pin<'a, B, const N: usize> {
    port: &'a mut BitPort<B, N>,
    position: usize,
}

impl<'a, B, const N: usize> Pin<'a, B, N> {
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<'a, B: InputBus, const N: usize> Pin<'a, B, N> {
    /// Reads the pin, sampling the whole chain
    pub fn value(&mut self) -> Result<bool, PortError<B::Error>> {
        self.port.read_bit(self.position)
    }
}

impl<'a, B: OutputBus, const N: usize> Pin<'a, B, N> {
    pub fn set_value(&mut self, value: bool) -> Result<(), PortError<B::Error>> {
        self.port.write_bit(self.position, value)
    }
}

impl<'a, B: OutputBus, const N: usize> OutputPin for Pin<'a, B, N> {
    type Error = PortError<B::Error>;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_value(false)
    }
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_value(true)
    }
}

impl<'a, B: OutputBus, const N: usize> StatefulOutputPin for Pin<'a, B, N> {
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        Ok(self.port.cached_bit(self.position)?)
    }
    fn is_set_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.port.cached_bit(self.position)?)
    }
}

impl<'a, B: OutputBus, const N: usize> ToggleableOutputPin for Pin<'a, B, N> {
    type Error = PortError<B::Error>;

    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.port.toggle_bit(self.position)
    }
}
