/// 7 bit address with A0-A2 tied low
pub const DEFAULT_ADDRESS: u8 = 0x20;
/// Pins 0-7 are GPA0-GPA7, pins 8-15 are GPB0-GPB7
pub const PIN_COUNT: u8 = 16;

/// Port A register addresses with IOCON.BANK = 0. The port B register always
/// follows its port A register, so 16 bit values are read and written as
/// sequential A then B pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Register(u8);
impl From<Register> for u8 {
    fn from(reg: Register) -> Self {
        reg.0
    }
}
impl Register {
    /// I/O direction, 1 = input
    pub const IODIR: Self = Self(0x00);
    /// Input polarity, 1 = GPIO reads the inverted pin level
    pub const IPOL: Self = Self(0x02);
    /// Interrupt on change enable
    pub const GPINTEN: Self = Self(0x04);
    /// Compare value for interrupt on change
    pub const DEFVAL: Self = Self(0x06);
    /// 0 = compare against previous pin value, 1 = compare against DEFVAL
    pub const INTCON: Self = Self(0x08);
    pub const IOCON: Self = Self(0x0a);
    /// 100k pull-ups, 1 = enabled
    pub const GPPU: Self = Self(0x0c);
    /// Pins that caused the pending interrupt
    pub const INTF: Self = Self(0x0e);
    /// Pin levels captured when the interrupt fired. Reading clears the interrupt.
    pub const INTCAP: Self = Self(0x10);
    pub const GPIO: Self = Self(0x12);
    /// Output latches
    pub const OLAT: Self = Self(0x14);

    /// The same register on the given port
    pub fn on(self, port: Port) -> Self {
        match port {
            Port::A => self,
            Port::B => Self(self.0 + 1),
        }
    }
}

/// IOCON flags. Only the flags this driver can run with are exposed: BANK
/// must stay 0 and sequential addressing enabled for the paired register access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct IoCon(u8);
impl From<IoCon> for u8 {
    fn from(iocon: IoCon) -> Self {
        iocon.0
    }
}
impl IoCon {
    pub const NONE: Self = Self(0b0000_0000);
    /// INTA and INTB are both driven by either port
    pub const MIRROR: Self = Self(0b0100_0000);
    /// Slew rate control on SDA disabled
    pub const DISSLW: Self = Self(0b0001_0000);
    /// Interrupt lines are open drain
    pub const ODR: Self = Self(0b0000_0100);
    /// Interrupt lines are active high. Ignored when ODR is set.
    pub const INTPOL: Self = Self(0b0000_0010);

    /// Keeps only the supported flags of a raw register value
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & (Self::MIRROR.0 | Self::DISSLW.0 | Self::ODR.0 | Self::INTPOL.0))
    }
    pub fn bits(self) -> u8 {
        self.0
    }
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}
impl core::ops::BitOr for IoCon {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// One of the two 8 bit ports
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Port {
    A,
    B,
}
impl Port {
    /// Index of the port's byte in a 16 bit pair
    pub fn index(self) -> usize {
        match self {
            Port::A => 0,
            Port::B => 1,
        }
    }
    /// The port a pin belongs to
    pub fn of(pin: u8) -> Option<Port> {
        match pin {
            0..=7 => Some(Port::A),
            8..=15 => Some(Port::B),
            _ => None,
        }
    }
    /// Pin number of bit 0 of this port
    pub fn first_pin(self) -> u8 {
        match self {
            Port::A => 0,
            Port::B => 8,
        }
    }
}
