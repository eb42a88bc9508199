use core::convert::Infallible;

use embedded_hal::digital::v2::InputPin;
use log::debug;
use ufmt::{uDisplay, uWrite, Formatter};

use crate::port::{BitPort, InputBus, PortError};

/// A free running millisecond counter. Wraps around at `u32::MAX`.
pub trait Monotonic {
    fn millis(&self) -> u32;
}

impl<F: Fn() -> u32> Monotonic for F {
    fn millis(&self) -> u32 {
        self()
    }
}

/// Lets a polling loop sample no faster than a fixed rate
pub struct Sampler<C> {
    clock: C,
    interval_ms: u32,
    previous: u32,
}

impl<C: Monotonic> Sampler<C> {
    /// The first interval starts now
    pub fn new(clock: C, interval_ms: u32) -> Self {
        let previous = clock.millis();
        Self {
            clock,
            interval_ms,
            previous,
        }
    }
    /// Samples `rate_hz` times per second. A rate that isn't positive never samples.
    pub fn from_rate(clock: C, rate_hz: f32) -> Self {
        let interval_ms = if rate_hz > 0.0 {
            (1000.0 / rate_hz + 0.5) as u32
        } else {
            u32::MAX
        };
        Self::new(clock, interval_ms)
    }
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }
    /// True once a full interval has passed since the last sample. The next
    /// interval is measured from this call.
    pub fn ready(&mut self) -> bool {
        let now = self.clock.millis();
        if now.wrapping_sub(self.previous) >= self.interval_ms {
            self.previous = now;
            return true;
        }
        false
    }
    /// Non blocking form of [Sampler::ready], for use with `nb::block!`
    pub fn wait(&mut self) -> nb::Result<(), Infallible> {
        if self.ready() {
            return Ok(());
        }
        Err(nb::Error::WouldBlock)
    }
}

/// Reports a port buffer only when it differs from the last one reported
pub struct ChangeDetector<const N: usize> {
    previous: Option<[u8; N]>,
}

impl<const N: usize> ChangeDetector<N> {
    pub fn new() -> Self {
        Self { previous: None }
    }
    /// The last buffer reported
    pub fn previous(&self) -> Option<[u8; N]> {
        self.previous
    }
    /// Forgets the baseline, the next buffer is reported whatever it holds
    pub fn reset(&mut self) {
        self.previous = None;
    }
    /// Returns `current` if it is the first buffer seen or differs from the
    /// previous one, which it then replaces
    pub fn observe(&mut self, current: &[u8; N]) -> Option<[u8; N]> {
        if self.previous.as_ref() == Some(current) {
            return None;
        }
        self.previous = Some(*current);
        Some(*current)
    }
    /// Reads the whole port once and reports the buffer if it changed
    pub fn poll<B: InputBus>(
        &mut self,
        port: &mut BitPort<B, N>,
    ) -> Result<Option<[u8; N]>, PortError<B::Error>> {
        let current = port.read_buffer()?;
        Ok(self.observe(&current))
    }
}

impl<const N: usize> Default for ChangeDetector<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrqState {
    /// The interrupt line is inactive
    Idle,
    /// The line went active and the chip has not been cleared yet
    Flagged,
}

/// Polls an active low interrupt line. Once flagged the monitor stays
/// flagged until [InterruptMonitor::acknowledge] is called, which the caller
/// does after clearing the interrupt on the chip.
pub struct InterruptMonitor<INT> {
    line: INT,
    state: IrqState,
}

impl<INT: InputPin> InterruptMonitor<INT> {
    pub fn new(line: INT) -> Self {
        Self {
            line,
            state: IrqState::Idle,
        }
    }
    pub fn state(&self) -> IrqState {
        self.state
    }
    /// Samples the line while idle. A flagged monitor doesn't touch the line.
    pub fn poll(&mut self) -> Result<IrqState, INT::Error> {
        if self.state == IrqState::Idle && self.line.is_low()? {
            debug!("interrupt line active");
            self.state = IrqState::Flagged;
        }
        Ok(self.state)
    }
    pub fn acknowledge(&mut self) {
        self.state = IrqState::Idle;
    }
    pub fn release(self) -> INT {
        self.line
    }
}

/// Failure while servicing an interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError<E, L> {
    Port(PortError<E>),
    /// The interrupt line could not be read
    Line(L),
}

impl<E, L> From<PortError<E>> for ServiceError<E, L> {
    fn from(err: PortError<E>) -> Self {
        ServiceError::Port(err)
    }
}

impl<E, L> uDisplay for ServiceError<E, L> {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            ServiceError::Port(err) => <PortError<E> as uDisplay>::fmt(err, f),
            ServiceError::Line(_) => f.write_str("interrupt line read failed"),
        }
    }
}
