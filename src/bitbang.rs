use embedded_hal::{
    blocking::spi::{Transfer, Write},
    digital::v2::{InputPin, OutputPin},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError<D, C> {
    Data(D),
    Clock(C),
}

/// Software serial output on two GPIO lines, MSB first.
/// Data is set up while the clock is low and taken by the chip on the rising edge.
pub struct SerialOut<DATA, CLK> {
    data: DATA,
    clock: CLK,
}

impl<DATA, CLK> SerialOut<DATA, CLK> {
    /// The clock line is expected to idle low
    pub fn new(data: DATA, clock: CLK) -> Self {
        Self { data, clock }
    }
    pub fn release(self) -> (DATA, CLK) {
        (self.data, self.clock)
    }
}

impl<DATA, CLK> Write<u8> for SerialOut<DATA, CLK>
where
    DATA: OutputPin,
    CLK: OutputPin,
{
    type Error = SerialError<DATA::Error, CLK::Error>;

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        for word in words {
            for bit in (0..8).rev() {
                if word & (1 << bit) != 0 {
                    self.data.set_high().map_err(SerialError::Data)?;
                } else {
                    self.data.set_low().map_err(SerialError::Data)?;
                }
                self.clock.set_high().map_err(SerialError::Clock)?;
                self.clock.set_low().map_err(SerialError::Clock)?;
            }
        }
        Ok(())
    }
}

/// Software serial input on two GPIO lines, MSB first.
/// Each bit is sampled before the rising edge that shifts the next one out.
pub struct SerialIn<DATA, CLK> {
    data: DATA,
    clock: CLK,
}

impl<DATA, CLK> SerialIn<DATA, CLK> {
    /// The clock line is expected to idle low
    pub fn new(data: DATA, clock: CLK) -> Self {
        Self { data, clock }
    }
    pub fn release(self) -> (DATA, CLK) {
        (self.data, self.clock)
    }
}

impl<DATA, CLK> Transfer<u8> for SerialIn<DATA, CLK>
where
    DATA: InputPin,
    CLK: OutputPin,
{
    type Error = SerialError<DATA::Error, CLK::Error>;

    /// Outgoing words are ignored, there is no data out line
    fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], Self::Error> {
        for word in words.iter_mut() {
            let mut value = 0u8;
            for _ in 0..8 {
                value <<= 1;
                if self.data.is_high().map_err(SerialError::Data)? {
                    value |= 1;
                }
                self.clock.set_high().map_err(SerialError::Clock)?;
                self.clock.set_low().map_err(SerialError::Clock)?;
            }
            *word = value;
        }
        Ok(words)
    }
}
