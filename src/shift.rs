use embedded_hal::{
    blocking::spi::{Transfer, Write},
    digital::v2::OutputPin,
};

use crate::port::{BitPort, InputBus, OutputBus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftError<S, P> {
    /// The serial transfer failed
    Spi(S),
    /// The latch line could not be driven
    Latch(P),
}

/// A chain of 74HC165 parallel-in serial-out registers.
///
/// `SPI` clocks CLK and samples QH of the nearest chip (MSB first), `LATCH` drives SH/LD.
/// Daisy chained chips feed QH into the SER pin of the chip in front of them,
/// so the nearest chip is shifted out first and lands in byte 0.
pub struct Hc165<SPI, LATCH> {
    spi: SPI,
    latch: LATCH,
}

impl<SPI, LATCH> Hc165<SPI, LATCH> {
    pub fn new(spi: SPI, latch: LATCH) -> Self {
        Self { spi, latch }
    }
    pub fn release(self) -> (SPI, LATCH) {
        (self.spi, self.latch)
    }
}

impl<SPI, LATCH, SE, PE> InputBus for Hc165<SPI, LATCH>
where
    SPI: Transfer<u8, Error = SE>,
    LATCH: OutputPin<Error = PE>,
{
    type Error = ShiftError<SE, PE>;

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        // SH/LD low loads the parallel inputs, high freezes them for shifting
        self.latch.set_low().map_err(ShiftError::Latch)?;
        self.latch.set_high().map_err(ShiftError::Latch)?;
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        self.spi.transfer(buffer).map_err(ShiftError::Spi)?;
        Ok(())
    }
}

/// A chain of 74HC595 serial-in parallel-out registers.
///
/// `SPI` clocks SRCLK and drives SER (MSB first, so QH carries bit 7),
/// `LATCH` drives RCLK. The last byte shifted stays in the nearest chip, so
/// the buffer is sent from its end back to byte 0.
pub struct Hc595<SPI, LATCH> {
    spi: SPI,
    latch: LATCH,
}

impl<SPI, LATCH> Hc595<SPI, LATCH> {
    pub fn new(spi: SPI, latch: LATCH) -> Self {
        Self { spi, latch }
    }
    pub fn release(self) -> (SPI, LATCH) {
        (self.spi, self.latch)
    }
}

impl<SPI, LATCH, SE, PE> OutputBus for Hc595<SPI, LATCH>
where
    SPI: Write<u8, Error = SE>,
    LATCH: OutputPin<Error = PE>,
{
    type Error = ShiftError<SE, PE>;

    fn write(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
        self.latch.set_low().map_err(ShiftError::Latch)?;
        for byte in buffer.iter().rev() {
            self.spi.write(&[*byte]).map_err(ShiftError::Spi)?;
        }
        // Outputs only follow the shift stage on the rising edge, an aborted
        // shift above never reaches the pins
        self.latch.set_high().map_err(ShiftError::Latch)?;
        Ok(())
    }
}

/// Input port over `N` chained 74HC165s
pub type InputShiftRegister<SPI, LATCH, const N: usize> = BitPort<Hc165<SPI, LATCH>, N>;
/// Output port over `N` chained 74HC595s
pub type OutputShiftRegister<SPI, LATCH, const N: usize> = BitPort<Hc595<SPI, LATCH>, N>;

impl<SPI, LATCH, const N: usize> BitPort<Hc165<SPI, LATCH>, N> {
    pub fn hc165(spi: SPI, latch: LATCH) -> Self {
        BitPort::new(Hc165::new(spi, latch))
    }
}

impl<SPI, LATCH, const N: usize> BitPort<Hc595<SPI, LATCH>, N> {
    /// The outputs are assumed low until the first write
    pub fn hc595(spi: SPI, latch: LATCH) -> Self {
        BitPort::new(Hc595::new(spi, latch))
    }
}
