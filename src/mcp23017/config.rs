use crate::port::OutOfRange;

use super::registers::{IoCon, Port, PIN_COUNT};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pull {
    None,
    Up,
}

/// Configuration of a single expander pin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinConfig {
    pub direction: Direction,
    /// Output level. Ignored for inputs.
    pub value: bool,
    pub pull: Pull,
    /// Reads return the inverted pin level
    pub invert: bool,
}

impl PinConfig {
    pub const fn output(value: bool) -> Self {
        Self {
            direction: Direction::Output,
            value,
            pull: Pull::None,
            invert: false,
        }
    }
    pub const fn input(pull: Pull, invert: bool) -> Self {
        Self {
            direction: Direction::Input,
            value: false,
            pull,
            invert,
        }
    }
}

/// Power on state of the chip
impl Default for PinConfig {
    fn default() -> Self {
        Self::input(Pull::None, false)
    }
}

/// The per-pin records of [PortConfig] folded into register values
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Masks {
    pub iodir: u16,
    pub gppu: u16,
    pub ipol: u16,
    pub olat: u16,
}

/// Configuration of all 16 expander pins, written to the chip in one go by
/// [super::Mcp23017::configure]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortConfig {
    pins: [PinConfig; PIN_COUNT as usize],
}

impl PortConfig {
    pub fn new() -> PortConfig {
        Self {
            pins: [PinConfig::default(); PIN_COUNT as usize],
        }
    }
    pub fn set_pin(mut self, pin: u8, config: PinConfig) -> Result<PortConfig, OutOfRange> {
        match self.pins.get_mut(pin as usize) {
            Some(slot) => {
                *slot = config;
                Ok(self)
            }
            None => Err(OutOfRange {
                position: pin as usize,
                width: PIN_COUNT as usize,
            }),
        }
    }
    /// Applies `config` to all eight pins of `port`
    pub fn set_port(mut self, port: Port, config: PinConfig) -> PortConfig {
        let first = port.first_pin() as usize;
        for slot in self.pins[first..first + 8].iter_mut() {
            *slot = config;
        }
        self
    }
    pub fn pin(&self, pin: u8) -> Option<PinConfig> {
        self.pins.get(pin as usize).copied()
    }
    pub fn masks(&self) -> Masks {
        let mut masks = Masks::default();
        for (pin, config) in self.pins.iter().enumerate() {
            let bit = 1u16 << pin;
            match config.direction {
                Direction::Input => masks.iodir |= bit,
                Direction::Output => {
                    if config.value {
                        masks.olat |= bit;
                    }
                }
            }
            if config.pull == Pull::Up {
                masks.gppu |= bit;
            }
            if config.invert {
                masks.ipol |= bit;
            }
        }
        masks
    }
}

impl Default for PortConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt on change setup written by [super::Mcp23017::configure_interrupts]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct InterruptConfig {
    /// GPINTEN
    pub enable: u16,
    /// INTCON, pins set here are compared against `default_value` instead of their previous level
    pub compare: u16,
    /// DEFVAL
    pub default_value: u16,
    pub iocon: IoCon,
}

impl InterruptConfig {
    /// Interrupt whenever an enabled pin changes from its previous level
    pub fn on_change(enable: u16) -> InterruptConfig {
        Self {
            enable,
            ..Default::default()
        }
    }
    /// Interrupt while the pins in `compare` differ from `default_value`
    pub fn set_compare(mut self, compare: u16, default_value: u16) -> InterruptConfig {
        self.compare = compare;
        self.default_value = default_value;
        self
    }
    pub fn set_iocon(mut self, iocon: IoCon) -> InterruptConfig {
        self.iocon = iocon;
        self
    }
}

/// Maps a range of input pins onto a range of output pins of the same width
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mirror {
    pub input_base: u8,
    pub output_base: u8,
    pub width: u8,
}

impl Mirror {
    /// GPB0-GPB7 drive GPA0-GPA7
    pub const PORT_B_TO_A: Self = Self::new(8, 0, 8);
    /// GPA0-GPA7 drive GPB0-GPB7
    pub const PORT_A_TO_B: Self = Self::new(0, 8, 8);

    pub const fn new(input_base: u8, output_base: u8, width: u8) -> Self {
        Self {
            input_base,
            output_base,
            width,
        }
    }
    /// The output driven by `input`, if it is mirrored at all
    pub fn target(&self, input: u8) -> Option<u8> {
        let offset = input.checked_sub(self.input_base)?;
        if offset < self.width {
            return self.output_base.checked_add(offset);
        }
        None
    }
}
